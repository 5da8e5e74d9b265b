//! World tuning. Every struct has a `Default` and deserializes with missing
//! fields filled from it, so a host can load partial JSON.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionConfig;
use crate::error::PhysicsError;
use crate::ground::GroundPlane;
use crate::integrator::Integrator;
use crate::types::Bounds;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec3,
    /// Gauss-Seidel passes over the constraints per substep, at least 1.
    pub solver_iterations: u32,
    /// Equal slices each `step(dt)` is split into, at least 1.
    pub substeps: u32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub integrator: Integrator,
    /// `None` disables ground contact.
    pub ground: Option<GroundPlane>,
    pub collision: CollisionConfig,
    pub fracture: FractureConfig,
    /// Bodies whose centre leaves this region are removed.
    pub bounds: Option<Bounds>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            solver_iterations: 8,
            substeps: 1,
            linear_damping: 0.0,
            angular_damping: 0.0,
            integrator: Integrator::default(),
            ground: Some(GroundPlane::default()),
            collision: CollisionConfig::default(),
            fracture: FractureConfig::default(),
            bounds: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractureConfig {
    /// Fraction of the stored energy converted into separation.
    pub energy_transfer_ratio: f32,
    /// Cap on the speed change a single fracture gives a body.
    pub max_delta_v: Option<f32>,
    /// Sum all breaks hitting a body in one substep and apply them once.
    pub accumulate: bool,
    /// Steps during which freshly separated bodies ignore each other.
    pub collision_grace_steps: u32,
}

impl Default for FractureConfig {
    fn default() -> Self {
        Self {
            energy_transfer_ratio: 1.0,
            max_delta_v: None,
            accumulate: true,
            collision_grace_steps: 8,
        }
    }
}

fn invalid(msg: impl Into<String>) -> PhysicsError {
    PhysicsError::InvalidConfig(msg.into())
}

fn non_negative(name: &str, value: f32) -> Result<(), PhysicsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and non-negative, got {value}")))
    }
}

impl WorldConfig {
    /// Reject settings the solver cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite"));
        }
        if self.solver_iterations == 0 {
            return Err(invalid("solver_iterations must be at least 1"));
        }
        if self.substeps == 0 {
            return Err(invalid("substeps must be at least 1"));
        }
        non_negative("linear_damping", self.linear_damping)?;
        non_negative("angular_damping", self.angular_damping)?;

        if let Some(ground) = &self.ground {
            if !ground.normal.is_finite() || ground.normal.length_squared() < 1e-12 {
                return Err(invalid("ground normal must be a non-zero vector"));
            }
            if !ground.distance.is_finite() {
                return Err(invalid("ground distance must be finite"));
            }
            non_negative("ground restitution", ground.restitution)?;
            non_negative("ground friction", ground.friction)?;
            non_negative("ground resting_speed", ground.resting_speed)?;
        }

        let collision = &self.collision;
        if !(0.0..=1.0).contains(&collision.position_correction) {
            return Err(invalid("position_correction must lie in [0, 1]"));
        }
        non_negative("penetration_slop", collision.penetration_slop)?;

        non_negative("energy_transfer_ratio", self.fracture.energy_transfer_ratio)?;
        if let Some(limit) = self.fracture.max_delta_v {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(invalid("max_delta_v must be positive"));
            }
        }

        if let Some(bounds) = &self.bounds {
            if !bounds.min.cmple(bounds.max).all() {
                return Err(invalid("bounds min must not exceed max"));
            }
        }
        Ok(())
    }
}
