//! # Simulation World
//!
//! The [`World`] owns every body and constraint and advances them with a
//! fixed pipeline. Each call to [`World::step`] is split into
//! `config.substeps` equal substeps, each running:
//!
//! 1.  external forces and damping,
//! 2.  `solver_iterations` Gauss-Seidel passes over the active constraints,
//! 3.  fracture of constraints whose break criterion tripped,
//! 4.  pose integration, freezing bodies whose state blew up,
//! 5.  ground contact, then all-pairs body contact,
//! 6.  energy bookkeeping.
//!
//! Bodies and constraints are addressed by generational handles, so a
//! handle to a removed entry never aliases a newer one.

mod config;

pub use config::{FractureConfig, WorldConfig};

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use tracing::{debug, trace};

use crate::body::Body;
use crate::collision::CollisionDispatcher;
use crate::constraint::Constraint;
use crate::error::PhysicsError;
use crate::integrator::ForceField;
use crate::shapes::Shape;
use crate::steps::{constraints, contact, energy, fracture, integration, pair_key};
use crate::storage::Slots;
use crate::types::{BodyHandle, BodySnapshot, ConstraintHandle, EnergyReport, FractureEvent, LinkSnapshot, StepStats};

pub struct World {
    config: WorldConfig,
    pub(crate) bodies: Slots<Body>,
    pub(crate) constraints: Slots<Constraint>,
    dispatcher: CollisionDispatcher,
    energy: EnergyReport,
    stats: StepStats,
    fracture_events: Vec<FractureEvent>,
    /// Freshly separated pairs and the steps left before they collide again.
    grace: HashMap<(BodyHandle, BodyHandle), u32>,
    time: f32,
    step_count: u64,
}

impl World {
    /// Create an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: WorldConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        debug!(?config, "world created");
        Ok(Self {
            config,
            bodies: Slots::default(),
            constraints: Slots::default(),
            dispatcher: CollisionDispatcher::new(),
            energy: EnergyReport::default(),
            stats: StepStats::default(),
            fracture_events: Vec::new(),
            grace: HashMap::new(),
            time: 0.0,
            step_count: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Simulated seconds so far.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    // --- registration ---

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        self.bodies.insert(body)
    }

    /// Immovable point, e.g. the pinned end of a chain.
    pub fn add_anchor(&mut self, position: Vec3) -> BodyHandle {
        self.add_body(Body::fixed(Shape::Point, position))
    }

    /// Remove a body. Constraints attached to it are marked broken.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] for a stale or foreign handle.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body, PhysicsError> {
        let body = self.bodies.remove(handle).ok_or(PhysicsError::UnknownBody(handle))?;
        constraints::invalidate_orphans(&self.bodies, &mut self.constraints);
        self.grace.retain(|&(a, b), _| a != handle && b != handle);
        Ok(body)
    }

    /// Register a prebuilt constraint.
    ///
    /// # Errors
    ///
    /// Fails if either body is unknown or both ends are the same body.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintHandle, PhysicsError> {
        let (a, b) = constraint.bodies();
        self.check_pair(a, b)?;
        Ok(self.constraints.insert(constraint))
    }

    pub(crate) fn check_pair(&self, a: BodyHandle, b: BodyHandle) -> Result<(), PhysicsError> {
        if a == b {
            return Err(PhysicsError::SelfConstraint(a));
        }
        for handle in [a, b] {
            if !self.bodies.contains(handle) {
                return Err(PhysicsError::UnknownBody(handle));
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownConstraint`] for a stale or foreign handle.
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Constraint, PhysicsError> {
        self.constraints
            .remove(handle)
            .ok_or(PhysicsError::UnknownConstraint(handle))
    }

    /// Drop broken constraints from storage; returns how many were removed.
    pub fn prune_broken_constraints(&mut self) -> usize {
        let broken: Vec<ConstraintHandle> = self
            .constraints
            .iter::<ConstraintHandle>()
            .filter(|(_, c)| c.is_broken())
            .map(|(h, _)| h)
            .collect();
        for handle in &broken {
            self.constraints.remove(*handle);
        }
        broken.len()
    }

    // --- host input ---

    /// Queue a force on a body for the next step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] for a stale or foreign handle.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?
            .add_force(force);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] for a stale or foreign handle.
    pub fn apply_torque(&mut self, handle: BodyHandle, torque: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?
            .add_torque(torque);
        Ok(())
    }

    /// Apply an impulse at a world point immediately.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] for a stale or foreign handle.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3, point: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?
            .apply_impulse(impulse, point);
        Ok(())
    }

    // --- queries ---

    #[must_use]
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Live bodies in ascending handle order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.constraints.get(handle)
    }

    pub fn constraint_mut(&mut self, handle: ConstraintHandle) -> Option<&mut Constraint> {
        self.constraints.get_mut(handle)
    }

    /// Stored constraints, broken ones included until pruned.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintHandle, &Constraint)> + '_ {
        self.constraints.iter()
    }

    #[must_use]
    pub fn active_constraint_count(&self) -> usize {
        self.constraints
            .iter::<ConstraintHandle>()
            .filter(|(_, c)| !c.is_broken())
            .count()
    }

    /// World-space anchor points, if both bodies still exist.
    #[must_use]
    pub fn constraint_endpoints(&self, handle: ConstraintHandle) -> Option<(Vec3, Vec3)> {
        let constraint = self.constraints.get(handle)?;
        let (a, b) = constraint.bodies();
        Some(constraint.anchors_world(self.bodies.get(a)?, self.bodies.get(b)?))
    }

    /// Energy totals measured at the end of the last substep.
    #[must_use]
    pub fn energy(&self) -> EnergyReport {
        self.energy
    }

    #[must_use]
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Take every fracture recorded since the last drain.
    pub fn drain_fracture_events(&mut self) -> Vec<FractureEvent> {
        std::mem::take(&mut self.fracture_events)
    }

    #[must_use]
    pub fn body_snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter::<BodyHandle>()
            .map(|(_, body)| BodySnapshot::from_body(body))
            .collect()
    }

    /// One record per stored constraint whose bodies both exist.
    #[must_use]
    pub fn link_snapshots(&self) -> Vec<LinkSnapshot> {
        self.constraints
            .iter::<ConstraintHandle>()
            .filter_map(|(_, constraint)| {
                let (a, b) = constraint.bodies();
                let (body_a, body_b) = (self.bodies.get(a)?, self.bodies.get(b)?);
                let (start, end) = constraint.anchors_world(body_a, body_b);
                Some(LinkSnapshot {
                    start: start.to_array(),
                    stress: constraint.stress(body_a, body_b),
                    end: end.to_array(),
                    broken: u32::from(constraint.is_broken()),
                })
            })
            .collect()
    }

    // --- stepping ---

    fn force_field(&self) -> ForceField {
        ForceField {
            gravity: self.config.gravity,
            linear_damping: self.config.linear_damping,
            angular_damping: self.config.angular_damping,
            integrator: self.config.integrator,
        }
    }

    /// Pairs that must not collide: joined by an active link or in grace.
    fn collision_exclusions(&self) -> HashSet<(BodyHandle, BodyHandle)> {
        self.constraints
            .iter::<ConstraintHandle>()
            .filter(|(_, c)| !c.is_broken())
            .map(|(_, c)| {
                let (a, b) = c.bodies();
                pair_key(a, b)
            })
            .chain(self.grace.keys().copied())
            .collect()
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// A non-finite or non-positive `dt` does nothing and returns the
    /// previous stats.
    pub fn step(&mut self, dt: f32) -> StepStats {
        if !dt.is_finite() || dt <= 0.0 {
            return self.stats;
        }
        let substeps = self.config.substeps.max(1);
        let h = dt / substeps as f32;
        let iterations = self.config.solver_iterations.max(1);
        let field = self.force_field();
        let mut stats = StepStats::default();

        for substep in 0..substeps {
            trace!(step = self.step_count, substep, h, "substep");

            integration::apply_external_forces(&mut self.bodies, &field, h);

            constraints::invalidate_orphans(&self.bodies, &mut self.constraints);
            constraints::solve_constraints(&mut self.bodies, &mut self.constraints, h, iterations);

            let events = fracture::process_fractures(&mut self.bodies, &mut self.constraints, &self.config.fracture);
            if self.config.fracture.collision_grace_steps > 0 {
                for event in &events {
                    self.grace
                        .insert(pair_key(event.body_a, event.body_b), self.config.fracture.collision_grace_steps);
                }
            }
            stats.broken_this_step += events.len();
            self.fracture_events.extend(events);

            stats.frozen_bodies += integration::integrate_bodies(&mut self.bodies, h);

            if let Some(ground) = &self.config.ground {
                stats.ground_contacts += contact::resolve_ground_contacts(&mut self.bodies, ground);
            }
            let excluded = self.collision_exclusions();
            stats.body_contacts += contact::resolve_body_contacts(
                &mut self.bodies,
                &self.dispatcher,
                &self.config.collision,
                &excluded,
            );

            self.energy = energy::measure_energy(&self.bodies, &mut self.constraints, self.config.gravity);
        }

        for (_, body) in self.bodies.iter_mut::<BodyHandle>() {
            body.clear_accumulators();
        }
        stats.removed_bodies = self.remove_out_of_bounds();
        self.grace.retain(|_, steps_left| {
            *steps_left = steps_left.saturating_sub(1);
            *steps_left > 0
        });

        stats.bodies = self.bodies.len();
        stats.active_constraints = self.active_constraint_count();
        self.stats = stats;
        self.time += dt;
        self.step_count += 1;
        stats
    }

    fn remove_out_of_bounds(&mut self) -> usize {
        let Some(bounds) = self.config.bounds else {
            return 0;
        };
        let escaped: Vec<BodyHandle> = self
            .bodies
            .iter::<BodyHandle>()
            .filter(|(_, body)| !body.is_static() && !bounds.contains(body.position))
            .map(|(h, _)| h)
            .collect();
        for handle in &escaped {
            debug!(?handle, "body left the world bounds, removing");
            self.bodies.remove(*handle);
        }
        if !escaped.is_empty() {
            constraints::invalidate_orphans(&self.bodies, &mut self.constraints);
            self.grace
                .retain(|&(a, b), _| self.bodies.contains(a) && self.bodies.contains(b));
        }
        escaped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{BreakCriterion, ConstraintParams};

    fn weightless() -> WorldConfig {
        WorldConfig {
            gravity: Vec3::ZERO,
            ground: None,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = World::new(WorldConfig {
            substeps: 0,
            ..WorldConfig::default()
        });
        assert!(matches!(result, Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn bad_dt_is_a_no_op() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let h = world.add_body(Body::new(Shape::sphere(0.5), 1.0, Vec3::new(0.0, 3.0, 0.0)));
        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            world.step(dt);
        }
        assert_eq!(world.body(h).unwrap().position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(world.step_count(), 0);
    }

    #[test]
    fn self_and_unknown_constraints_are_errors() {
        let mut world = World::new(weightless()).unwrap();
        let a = world.add_body(Body::new(Shape::Point, 1.0, Vec3::ZERO));
        let b = world.add_body(Body::new(Shape::Point, 1.0, Vec3::X));
        let params = ConstraintParams::rigid();

        let same = Constraint::new(a, a, Vec3::ZERO, Vec3::ZERO, 1.0, params);
        assert_eq!(world.add_constraint(same).unwrap_err(), PhysicsError::SelfConstraint(a));

        world.remove_body(b).unwrap();
        let dangling = Constraint::new(a, b, Vec3::ZERO, Vec3::ZERO, 1.0, params);
        assert_eq!(world.add_constraint(dangling).unwrap_err(), PhysicsError::UnknownBody(b));
        assert!(matches!(world.remove_body(b), Err(PhysicsError::UnknownBody(_))));
    }

    #[test]
    fn removing_a_body_breaks_its_constraints() {
        let mut world = World::new(weightless()).unwrap();
        let a = world.add_body(Body::new(Shape::Point, 1.0, Vec3::ZERO));
        let b = world.add_body(Body::new(Shape::Point, 1.0, Vec3::X));
        let link = world
            .add_constraint(Constraint::new(a, b, Vec3::ZERO, Vec3::ZERO, 1.0, ConstraintParams::rigid()))
            .unwrap();
        world.remove_body(b).unwrap();
        assert!(world.constraint(link).unwrap().is_broken());
        assert_eq!(world.prune_broken_constraints(), 1);
        assert!(world.constraint(link).is_none());
        world.step(0.01);
        assert_eq!(world.stats().active_constraints, 0);
    }

    #[test]
    fn fracture_emits_event_and_grace_period() {
        let mut world = World::new(weightless()).unwrap();
        let a = world.add_body(Body::new(Shape::sphere(0.1), 1.0, Vec3::ZERO));
        let b = world.add_body(Body::new(Shape::sphere(0.1), 1.0, Vec3::new(1.6, 0.0, 0.0)));
        let params = ConstraintParams::spring(1000.0, 0.0).breaking_at(BreakCriterion::Stretch { max: 0.5 });
        world
            .add_constraint(Constraint::new(a, b, Vec3::ZERO, Vec3::ZERO, 1.0, params))
            .unwrap();

        let stats = world.step(1.0 / 600.0);
        assert_eq!(stats.broken_this_step, 1);
        assert_eq!(stats.active_constraints, 0);

        let events = world.drain_fracture_events();
        assert_eq!(events.len(), 1);
        assert!((events[0].impulse_a + events[0].impulse_b).length() < 1e-3);
        assert!(world.drain_fracture_events().is_empty());
        assert!(world.grace.contains_key(&pair_key(a, b)));

        let va = world.body(a).unwrap().linear_velocity;
        let vb = world.body(b).unwrap().linear_velocity;
        assert!(vb.x > 10.0 && va.x < -10.0);
    }

    #[test]
    fn bodies_leaving_bounds_are_removed() {
        let mut world = World::new(WorldConfig {
            bounds: Some(crate::types::Bounds {
                min: Vec3::splat(-10.0),
                max: Vec3::splat(10.0),
            }),
            ..weightless()
        })
        .unwrap();
        let anchor = world.add_anchor(Vec3::new(0.0, 20.0, 0.0));
        let runaway = world.add_body(Body::new(Shape::Point, 1.0, Vec3::new(9.99, 0.0, 0.0)));
        let link = world
            .add_constraint(Constraint::new(anchor, runaway, Vec3::ZERO, Vec3::ZERO, 30.0, ConstraintParams::spring(0.0, 0.0)))
            .unwrap();
        world.body_mut(runaway).unwrap().linear_velocity = Vec3::new(10.0, 0.0, 0.0);

        let stats = world.step(0.1);
        assert_eq!(stats.removed_bodies, 1);
        assert!(world.body(runaway).is_none());
        assert!(world.body(anchor).is_some(), "static bodies stay");
        assert!(world.constraint(link).unwrap().is_broken());
    }
}
