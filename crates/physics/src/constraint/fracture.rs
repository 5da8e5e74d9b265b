//! Conversion of stored elastic energy into separation impulses.

use glam::Vec3;

use super::{Constraint, FractureDirection, FractureRelease};
use crate::body::Body;
use crate::transform::normalize_or;

/// Impulses one fracture applies, computed without touching either body.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FractureImpulse {
    /// Impulse on body A, applied at `point_a`.
    pub impulse_a: Vec3,
    pub impulse_b: Vec3,
    /// World-space anchor points at the moment of breaking.
    pub point_a: Vec3,
    pub point_b: Vec3,
    /// Elastic energy stored in the link when it broke.
    pub energy: f32,
}

impl Constraint {
    /// Unit direction the pair is pushed apart along, roughly from A to B.
    fn fracture_direction(&self, a: &Body, b: &Body) -> Vec3 {
        let (_, axis) = self.violation(a, b);
        match self.params.direction {
            FractureDirection::Axis => axis,
            FractureDirection::TorqueCross => {
                let (pa, pb) = self.anchors_world(a, b);
                let force = axis * self.lambda;
                let torque = (pa - a.center_of_mass_world()).cross(-force) + (pb - b.center_of_mass_world()).cross(force);
                let cross = torque.cross(force);
                if cross.length() < 1e-6 {
                    axis
                } else {
                    normalize_or(-cross, axis)
                }
            }
        }
    }

    /// Impulses that releasing `energy_ratio` of the stored energy would apply.
    ///
    /// Read-only, so every breaking constraint can be evaluated against the
    /// same body state before any impulse lands. `max_delta_v` caps the speed
    /// change of each body. A pair with no effective mass gets zero impulses.
    #[must_use]
    pub fn fracture_impulse(&self, a: &Body, b: &Body, energy_ratio: f32, max_delta_v: Option<f32>) -> FractureImpulse {
        let (point_a, point_b) = self.anchors_world(a, b);
        let energy = self.potential_energy(a, b);
        let mut out = FractureImpulse {
            point_a,
            point_b,
            energy,
            ..FractureImpulse::default()
        };

        let released = (energy * energy_ratio.max(0.0)).max(0.0);
        if released <= 0.0 || !released.is_finite() {
            return out;
        }
        let direction = self.fracture_direction(a, b);

        match self.params.release {
            FractureRelease::EffectiveMass => {
                let effective_mass = self.effective_mass(a, b, direction);
                let (wa, wb) = (a.inverse_mass(), b.inverse_mass());
                if effective_mass <= 0.0 || wa + wb <= 0.0 {
                    return out;
                }
                let magnitude = (2.0 * released * effective_mass).sqrt();
                out.impulse_a = -direction * (magnitude * wa / (wa + wb));
                out.impulse_b = direction * (magnitude * wb / (wa + wb));
            }
            FractureRelease::PerBody => {
                out.impulse_a = -direction * per_body_impulse(a, released);
                out.impulse_b = direction * per_body_impulse(b, released);
            }
        }

        if let Some(limit) = max_delta_v {
            out.impulse_a = clamp_delta_v(out.impulse_a, a.inverse_mass(), limit);
            out.impulse_b = clamp_delta_v(out.impulse_b, b.inverse_mass(), limit);
        }
        out
    }

    /// Break now: apply the fracture impulses at the anchors and deactivate.
    ///
    /// Returns `None` if the constraint was already broken.
    pub fn apply_fracture_impulse(
        &mut self,
        a: &mut Body,
        b: &mut Body,
        energy_ratio: f32,
        max_delta_v: Option<f32>,
    ) -> Option<FractureImpulse> {
        if self.broken {
            return None;
        }
        let fracture = self.fracture_impulse(a, b, energy_ratio, max_delta_v);
        a.apply_impulse(fracture.impulse_a, fracture.point_a);
        b.apply_impulse(fracture.impulse_b, fracture.point_b);
        self.mark_broken();
        Some(fracture)
    }
}

/// `m * sqrt(2 E / m)` for a dynamic body, zero otherwise.
fn per_body_impulse(body: &Body, energy: f32) -> f32 {
    let inverse_mass = body.inverse_mass();
    if inverse_mass <= 0.0 {
        return 0.0;
    }
    let delta_v = (2.0 * energy * inverse_mass).sqrt();
    delta_v / inverse_mass
}

fn clamp_delta_v(impulse: Vec3, inverse_mass: f32, limit: f32) -> Vec3 {
    let delta_v = impulse.length() * inverse_mass;
    if delta_v > limit && delta_v > 0.0 {
        impulse * (limit.max(0.0) / delta_v)
    } else {
        impulse
    }
}
