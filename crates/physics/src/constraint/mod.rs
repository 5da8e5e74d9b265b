//! # Breakable Constraints
//!
//! A [`Constraint`] keeps the anchor points of two bodies at a rest distance
//! and stores elastic energy while stretched. Once its [`BreakCriterion`]
//! trips it fractures: the stored energy is released as separating impulses
//! and the link goes permanently inactive.
//!
//! Two solve strategies share the same break and fracture contract:
//!
//! -   **Spring-damper:** `F = -(k x + c v)` given as stiffness and damping.
//! -   **Compliance:** the same spring given as compliance (inverse
//!     stiffness) with an error-reduction factor. Zero compliance gives a
//!     rigid distance link.
//!
//! Both are solved as a soft velocity constraint, which is implicit Euler on
//! the spring force and stays stable at any stiffness and step size.

mod fracture;
mod solve;

pub use fracture::FractureImpulse;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::collision::angular_term;
use crate::transform::{normalize_or, FALLBACK_AXIS};
use crate::types::BodyHandle;

/// How a constraint turns violation into impulses.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SolveStrategy {
    SpringDamper {
        /// N/m
        stiffness: f32,
        /// N s/m
        damping: f32,
    },
    Compliance {
        /// m/N; zero is rigid.
        compliance: f32,
        damping: f32,
        /// Fraction of the position error corrected per step, 0 to 1.
        error_reduction: f32,
    },
}

/// The single metric a constraint breaks on.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BreakCriterion {
    /// Absolute stretch or compression in metres.
    Stretch { max: f32 },
    /// Stretch relative to the rest length.
    RelativeStretch { max_ratio: f32 },
    /// Spring force `|k x|`, or `|lambda| / dt` for compliance links.
    Force { max: f32 },
    /// Accumulated impulse `|lambda|` of the current step.
    Impulse { max: f32 },
}

/// Conditions that must hold before a constraint is allowed to break.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakGate {
    /// Seconds after creation during which the link cannot break.
    pub activation_delay: f32,
    /// Minimum relative speed along the link axis; zero disables the check.
    pub min_axis_speed: f32,
}

/// Direction of the separating impulse on fracture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractureDirection {
    /// Along the link, from A towards B.
    #[default]
    Axis,
    /// `-(tau x f)` from the torque the link force exerts on the pair.
    TorqueCross,
}

/// How stored energy is converted into the separating impulse.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractureRelease {
    /// Each dynamic body gets `dv = sqrt(2 E / m)`.
    #[default]
    PerBody,
    /// One impulse `sqrt(2 m_eff E)` split by inverse-mass share.
    EffectiveMass,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintParams {
    pub strategy: SolveStrategy,
    /// `None` never breaks.
    pub break_criterion: Option<BreakCriterion>,
    #[serde(default)]
    pub gate: BreakGate,
    #[serde(default)]
    pub release: FractureRelease,
    #[serde(default)]
    pub direction: FractureDirection,
}

impl ConstraintParams {
    /// Unbreakable spring-damper.
    #[must_use]
    pub fn spring(stiffness: f32, damping: f32) -> Self {
        Self {
            strategy: SolveStrategy::SpringDamper {
                stiffness: stiffness.max(0.0),
                damping: damping.max(0.0),
            },
            break_criterion: None,
            gate: BreakGate::default(),
            release: FractureRelease::PerBody,
            direction: FractureDirection::Axis,
        }
    }

    /// Unbreakable compliant link.
    #[must_use]
    pub fn compliant(compliance: f32, damping: f32) -> Self {
        Self {
            strategy: SolveStrategy::Compliance {
                compliance: compliance.max(0.0),
                damping: damping.max(0.0),
                error_reduction: 1.0,
            },
            break_criterion: None,
            gate: BreakGate::default(),
            release: FractureRelease::EffectiveMass,
            direction: FractureDirection::TorqueCross,
        }
    }

    /// Unbreakable rigid distance link.
    #[must_use]
    pub fn rigid() -> Self {
        Self::compliant(0.0, 0.0)
    }

    #[must_use]
    pub fn breaking_at(mut self, criterion: BreakCriterion) -> Self {
        self.break_criterion = Some(criterion);
        self
    }

    #[must_use]
    pub fn with_gate(mut self, gate: BreakGate) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: FractureRelease) -> Self {
        self.release = release;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: FractureDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// A breakable link between two bodies.
///
/// Lifecycle is `Active -> Broken`; a broken constraint never applies
/// impulses again.
#[derive(Clone, Debug)]
pub struct Constraint {
    body_a: BodyHandle,
    body_b: BodyHandle,
    /// Anchor in A's body frame, relative to A's position.
    local_anchor_a: Vec3,
    local_anchor_b: Vec3,
    rest_length: f32,
    params: ConstraintParams,
    /// Signed impulse accumulated along the axis this step.
    lambda: f32,
    stored_energy: f32,
    age: f32,
    last_dt: f32,
    broken: bool,
}

impl Constraint {
    #[must_use]
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        local_anchor_a: Vec3,
        local_anchor_b: Vec3,
        rest_length: f32,
        params: ConstraintParams,
    ) -> Self {
        Self {
            body_a,
            body_b,
            local_anchor_a,
            local_anchor_b,
            rest_length: rest_length.max(0.0),
            params,
            lambda: 0.0,
            stored_energy: 0.0,
            age: 0.0,
            last_dt: 0.0,
            broken: false,
        }
    }

    #[must_use]
    pub fn bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body_a, self.body_b)
    }

    #[must_use]
    pub fn local_anchors(&self) -> (Vec3, Vec3) {
        (self.local_anchor_a, self.local_anchor_b)
    }

    #[must_use]
    pub fn params(&self) -> &ConstraintParams {
        &self.params
    }

    #[must_use]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    #[must_use]
    pub fn lambda(&self) -> f32 {
        self.lambda
    }

    /// Elastic energy as of the last solve or energy refresh.
    #[must_use]
    pub fn stored_energy(&self) -> f32 {
        self.stored_energy
    }

    /// Seconds since the constraint was created.
    #[must_use]
    pub fn age(&self) -> f32 {
        self.age
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Irreversibly deactivate the constraint.
    /// The released energy is reported in the fracture event, not kept here.
    pub fn mark_broken(&mut self) {
        self.broken = true;
        self.lambda = 0.0;
        self.stored_energy = 0.0;
    }

    pub fn set_rest_length(&mut self, rest_length: f32) {
        self.rest_length = rest_length.max(0.0);
        self.lambda = 0.0;
        self.stored_energy = 0.0;
    }

    /// Make the current anchor distance the rest length.
    pub fn reset_rest_length(&mut self, a: &Body, b: &Body) {
        let (pa, pb) = self.anchors_world(a, b);
        self.set_rest_length(pa.distance(pb));
    }

    #[must_use]
    pub fn anchors_world(&self, a: &Body, b: &Body) -> (Vec3, Vec3) {
        (a.local_to_world(self.local_anchor_a), b.local_to_world(self.local_anchor_b))
    }

    /// Anchor distance minus rest length, and the unit axis from A to B.
    /// Coincident anchors use `+Y` as the axis.
    #[must_use]
    pub fn violation(&self, a: &Body, b: &Body) -> (f32, Vec3) {
        let (pa, pb) = self.anchors_world(a, b);
        let delta = pb - pa;
        (delta.length() - self.rest_length, normalize_or(delta, FALLBACK_AXIS))
    }

    /// Mass seen by an impulse along `axis` at the anchors; zero if degenerate.
    #[must_use]
    pub fn effective_mass(&self, a: &Body, b: &Body, axis: Vec3) -> f32 {
        let inverse = self.inverse_effective_mass(a, b, axis);
        if inverse > 1e-12 && inverse.is_finite() {
            1.0 / inverse
        } else {
            0.0
        }
    }

    fn inverse_effective_mass(&self, a: &Body, b: &Body, axis: Vec3) -> f32 {
        let (pa, pb) = self.anchors_world(a, b);
        let ra = pa - a.center_of_mass_world();
        let rb = pb - b.center_of_mass_world();
        a.inverse_mass() + b.inverse_mass() + angular_term(a, ra, axis) + angular_term(b, rb, axis)
    }

    /// Relative anchor velocity of B with respect to A along `axis`.
    fn axis_speed(&self, a: &Body, b: &Body, axis: Vec3) -> f32 {
        let (pa, pb) = self.anchors_world(a, b);
        (b.velocity_at_point(pb) - a.velocity_at_point(pa)).dot(axis)
    }

    /// Elastic energy at the current geometry.
    #[must_use]
    pub fn potential_energy(&self, a: &Body, b: &Body) -> f32 {
        let (x, _) = self.violation(a, b);
        match self.params.strategy {
            SolveStrategy::SpringDamper { stiffness, .. } => 0.5 * stiffness * x * x,
            SolveStrategy::Compliance { compliance, .. } if compliance > 0.0 => 0.5 * x * x / compliance,
            SolveStrategy::Compliance { .. } => 0.0,
        }
    }

    pub(crate) fn refresh_stored_energy(&mut self, a: &Body, b: &Body) -> f32 {
        if self.broken {
            return 0.0;
        }
        self.stored_energy = self.potential_energy(a, b);
        self.stored_energy
    }

    /// Current value of the break metric, and its threshold.
    fn break_metric(&self, a: &Body, b: &Body) -> Option<(f32, f32)> {
        let criterion = self.params.break_criterion?;
        let (x, _) = self.violation(a, b);
        Some(match criterion {
            BreakCriterion::Stretch { max } => (x.abs(), max),
            BreakCriterion::RelativeStretch { max_ratio } => (x.abs() / self.rest_length.max(1e-6), max_ratio),
            BreakCriterion::Force { max } => {
                let force = match self.params.strategy {
                    SolveStrategy::SpringDamper { stiffness, .. } => (stiffness * x).abs(),
                    SolveStrategy::Compliance { .. } if self.last_dt > 0.0 => self.lambda.abs() / self.last_dt,
                    SolveStrategy::Compliance { .. } => 0.0,
                };
                (force, max)
            }
            BreakCriterion::Impulse { max } => (self.lambda.abs(), max),
        })
    }

    /// Whether the break metric exceeds its threshold and the gate is open.
    #[must_use]
    pub fn should_break(&self, a: &Body, b: &Body) -> bool {
        if self.broken {
            return false;
        }
        let Some((metric, threshold)) = self.break_metric(a, b) else {
            return false;
        };
        if metric <= threshold {
            return false;
        }

        let gate = self.params.gate;
        if self.age < gate.activation_delay {
            return false;
        }
        if gate.min_axis_speed > 0.0 {
            let (_, axis) = self.violation(a, b);
            if self.axis_speed(a, b, axis).abs() < gate.min_axis_speed {
                return false;
            }
        }
        true
    }

    /// Break metric over threshold; 1.0 means about to break. Zero when unbreakable.
    #[must_use]
    pub fn stress(&self, a: &Body, b: &Body) -> f32 {
        match self.break_metric(a, b) {
            Some((metric, threshold)) if threshold > 0.0 => metric / threshold,
            Some((metric, _)) if metric > 0.0 => f32::INFINITY,
            _ => 0.0,
        }
    }
}
