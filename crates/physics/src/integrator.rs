//! # Physics Integration
//!
//! Per-body force application and pose integration. The world runs the
//! constraint solve between the two halves, so a step is
//! `apply_forces -> solve -> integrate_pose`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::Body;

/// Scheme used for the force and damping half of a step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Integrator {
    /// `v += a dt`, then damping scales by `1 - d dt`.
    #[default]
    SemiImplicitEuler,
    /// Classic fourth-order Runge-Kutta on `dv/dt = a - d v`.
    Rk4,
}

/// Forces every dynamic body feels each step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceField {
    pub gravity: Vec3,
    /// Fraction of linear velocity removed per second.
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub integrator: Integrator,
}

/// Result of integrating one body's pose.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntegrationOutcome {
    Moved,
    /// The body is static or already frozen.
    Skipped,
    /// The new state was not finite; the body was frozen in place.
    Frozen,
}

/// One RK4 step of `dy/dt = f(y)`.
#[must_use]
pub fn rk4(y: Vec3, dt: f32, f: impl Fn(Vec3) -> Vec3) -> Vec3 {
    let k1 = f(y);
    let k2 = f(y + k1 * (dt * 0.5));
    let k3 = f(y + k2 * (dt * 0.5));
    let k4 = f(y + k3 * dt);
    y + (k1 + 2.0 * (k2 + k3) + k4) * (dt / 6.0)
}

/// Gravity, queued host forces and damping: a velocity update over `dt`.
pub fn apply_forces(body: &mut Body, field: &ForceField, dt: f32) {
    if body.is_immovable() {
        return;
    }
    let force = field.gravity * body.mass() + body.accumulated_force();
    let torque = body.accumulated_torque();
    match field.integrator {
        Integrator::SemiImplicitEuler => {
            body.integrate_velocity(force, torque, dt);
            body.linear_velocity *= (1.0 - field.linear_damping * dt).max(0.0);
            body.angular_velocity *= (1.0 - field.angular_damping * dt).max(0.0);
        }
        Integrator::Rk4 => {
            // Held constant over the step.
            let accel = force * body.inverse_mass();
            let angular_accel = body.mul_world_inverse_inertia(torque);
            let (linear, angular) = (field.linear_damping, field.angular_damping);
            body.linear_velocity = rk4(body.linear_velocity, dt, |v| accel - v * linear);
            body.angular_velocity = rk4(body.angular_velocity, dt, |w| angular_accel - w * angular);
        }
    }
}

/// Advance position and orientation, freezing the body on numerical blow-up.
///
/// A frozen body is put back at its pose from before this call. If that pose
/// was already corrupt it is reset to the origin.
pub fn integrate_pose(body: &mut Body, dt: f32) -> IntegrationOutcome {
    if body.is_immovable() {
        return IntegrationOutcome::Skipped;
    }
    let (position, orientation) = (body.position, body.orientation);
    body.integrate_position(dt);
    if body.is_finite() {
        return IntegrationOutcome::Moved;
    }

    body.position = if position.is_finite() { position } else { Vec3::ZERO };
    body.orientation = if orientation.is_finite() {
        orientation
    } else {
        Quat::IDENTITY
    };
    body.freeze();
    IntegrationOutcome::Frozen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;

    const FIELD: ForceField = ForceField {
        gravity: Vec3::new(0.0, -9.81, 0.0),
        linear_damping: 0.0,
        angular_damping: 0.0,
        integrator: Integrator::SemiImplicitEuler,
    };

    #[test]
    fn free_fall_single_step() {
        let mut body = Body::new(Shape::Point, 0.08, Vec3::new(0.0, 4.85, 0.0));
        let dt = 1.0 / 600.0;
        apply_forces(&mut body, &FIELD, dt);
        assert!((body.linear_velocity.y + 0.01635).abs() < 1e-5);
        assert_eq!(integrate_pose(&mut body, dt), IntegrationOutcome::Moved);
        assert!(body.position.y < 4.85);
    }

    #[test]
    fn host_force_is_added_to_gravity() {
        let mut body = Body::new(Shape::sphere(0.5), 2.0, Vec3::ZERO);
        body.add_force(Vec3::new(0.0, 2.0 * 9.81, 4.0));
        apply_forces(&mut body, &FIELD, 0.5);
        assert!(body.linear_velocity.y.abs() < 1e-5);
        assert!((body.linear_velocity.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn damping_bleeds_velocity() {
        let field = ForceField {
            gravity: Vec3::ZERO,
            linear_damping: 0.5,
            angular_damping: 1.0,
            integrator: Integrator::SemiImplicitEuler,
        };
        let mut body = Body::new(Shape::sphere(0.5), 1.0, Vec3::ZERO);
        body.linear_velocity = Vec3::X;
        body.angular_velocity = Vec3::Y;
        apply_forces(&mut body, &field, 0.1);
        assert!((body.linear_velocity.x - 0.95).abs() < 1e-6);
        assert!((body.angular_velocity.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rk4_damping_follows_the_exponential() {
        let field = ForceField {
            gravity: Vec3::ZERO,
            linear_damping: 0.5,
            angular_damping: 1.0,
            integrator: Integrator::Rk4,
        };
        let mut body = Body::new(Shape::sphere(0.5), 1.0, Vec3::ZERO);
        body.linear_velocity = Vec3::X;
        body.angular_velocity = Vec3::Y;
        apply_forces(&mut body, &field, 0.1);
        assert!((body.linear_velocity.x - (-0.05_f32).exp()).abs() < 1e-6);
        assert!((body.angular_velocity.y - (-0.1_f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn rk4_matches_euler_without_damping() {
        let mut euler = Body::new(Shape::Point, 2.0, Vec3::ZERO);
        let mut rk = euler.clone();
        euler.add_force(Vec3::new(3.0, 0.0, 0.0));
        rk.add_force(Vec3::new(3.0, 0.0, 0.0));
        apply_forces(&mut euler, &FIELD, 0.05);
        apply_forces(&mut rk, &ForceField { integrator: Integrator::Rk4, ..FIELD }, 0.05);
        assert!(euler.linear_velocity.abs_diff_eq(rk.linear_velocity, 1e-6));
    }

    #[test]
    fn non_finite_state_freezes_body() {
        let mut body = Body::new(Shape::sphere(0.5), 1.0, Vec3::new(1.0, 2.0, 3.0));
        body.linear_velocity = Vec3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(integrate_pose(&mut body, 0.01), IntegrationOutcome::Frozen);
        assert!(body.is_frozen());
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.linear_velocity, Vec3::ZERO);
        assert_eq!(integrate_pose(&mut body, 0.01), IntegrationOutcome::Skipped);
    }
}
