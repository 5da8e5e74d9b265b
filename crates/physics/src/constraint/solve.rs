//! Per-pass constraint solve.

use super::{Constraint, SolveStrategy};
use crate::body::Body;

impl Constraint {
    /// Start a new (sub)step: reset the accumulated impulse and advance the clock.
    pub fn begin_step(&mut self, dt: f32) {
        self.lambda = 0.0;
        self.last_dt = dt;
        self.age += dt;
    }

    /// One Gauss-Seidel pass of the soft velocity constraint. Returns the
    /// impulse applied along the axis.
    ///
    /// Both strategies are solved implicitly, so repeated passes converge to
    /// the implicit Euler step of the link force and never add energy.
    ///
    /// `a` and `b` must be the bodies this constraint was created with.
    pub fn solve(&mut self, a: &mut Body, b: &mut Body, dt: f32) -> f32 {
        if self.broken || dt <= 0.0 {
            return 0.0;
        }
        let (x, axis) = self.violation(a, b);
        let speed = self.axis_speed(a, b, axis);
        let inverse_mass = self.inverse_effective_mass(a, b, axis);
        if inverse_mass <= 1e-12 || !inverse_mass.is_finite() {
            return 0.0;
        }

        // Soft constraint: gamma softens the impulse, beta feeds back position error.
        let (gamma, beta) = match self.params.strategy {
            SolveStrategy::SpringDamper { stiffness, damping } => {
                self.stored_energy = 0.5 * stiffness * x * x;
                match soft_coefficients(stiffness, damping, dt) {
                    Some(coefficients) => coefficients,
                    None => return 0.0,
                }
            }
            SolveStrategy::Compliance {
                compliance,
                damping,
                error_reduction,
            } => {
                if compliance > 0.0 {
                    self.stored_energy = 0.5 * x * x / compliance;
                    match soft_coefficients(1.0 / compliance, damping, dt) {
                        Some((gamma, beta)) => (gamma, beta * error_reduction),
                        None => return 0.0,
                    }
                } else {
                    (0.0, error_reduction)
                }
            }
        };
        let delta_lambda = -(speed + beta / dt * x + gamma * self.lambda) / (inverse_mass + gamma);

        if !delta_lambda.is_finite() {
            return 0.0;
        }
        self.lambda += delta_lambda;

        let (pa, pb) = self.anchors_world(a, b);
        let impulse = axis * delta_lambda;
        a.apply_impulse(-impulse, pa);
        b.apply_impulse(impulse, pb);
        delta_lambda
    }
}

/// `(gamma, beta)` for stiffness `k` and damping `c`: implicit Euler on
/// `F = -(k x + c v)`. `None` when the link exerts no force at all.
fn soft_coefficients(stiffness: f32, damping: f32, dt: f32) -> Option<(f32, f32)> {
    let denom = damping.max(0.0) + dt * stiffness.max(0.0);
    if denom <= 0.0 || !denom.is_finite() {
        return None;
    }
    Some((1.0 / (dt * denom), dt * stiffness.max(0.0) / denom))
}
