//! Impulse-based contact response between two bodies

use glam::Vec3;

use super::{CollisionConfig, Contact};
use crate::body::Body;

/// Resolve one contact between `a` and `b` (normal from `a` to `b`).
///
/// Penetration is removed first, split by inverse mass. A normal impulse with
/// restitution follows for approaching bodies, then a Coulomb friction impulse
/// bounded by `friction * j_n`. Returns the normal impulse magnitude applied.
pub fn resolve_contact(a: &mut Body, b: &mut Body, contact: &Contact, config: &CollisionConfig) -> f32 {
    let (wa, wb) = (a.inverse_mass(), b.inverse_mass());
    let inv_mass_sum = wa + wb;
    if inv_mass_sum <= 0.0 {
        return 0.0;
    }
    let n = contact.normal;

    // Position correction to resolve penetration
    let correction = (contact.depth - config.penetration_slop).max(0.0) * config.position_correction / inv_mass_sum;
    if correction > 0.0 {
        a.position -= n * (correction * wa);
        b.position += n * (correction * wb);
    }

    let ra = contact.point - a.center_of_mass_world();
    let rb = contact.point - b.center_of_mass_world();

    let relative_velocity = b.velocity_at_point(contact.point) - a.velocity_at_point(contact.point);
    let velocity_along_normal = relative_velocity.dot(n);

    // Don't resolve if velocities are separating
    if velocity_along_normal >= 0.0 {
        return 0.0;
    }

    let k_normal = inv_mass_sum + angular_term(a, ra, n) + angular_term(b, rb, n);
    let j = -(1.0 + contact.restitution) * velocity_along_normal / k_normal;
    a.apply_impulse(-n * j, contact.point);
    b.apply_impulse(n * j, contact.point);

    // Friction on the post-impulse tangential slip
    let relative_velocity = b.velocity_at_point(contact.point) - a.velocity_at_point(contact.point);
    let tangent_velocity = relative_velocity - n * relative_velocity.dot(n);
    let tangent_speed = tangent_velocity.length();
    if contact.friction > 0.0 && tangent_speed > 1e-6 {
        let t = tangent_velocity / tangent_speed;
        let k_tangent = inv_mass_sum + angular_term(a, ra, t) + angular_term(b, rb, t);
        let jt = (tangent_speed / k_tangent).min(contact.friction * j);
        a.apply_impulse(t * jt, contact.point);
        b.apply_impulse(-t * jt, contact.point);
    }

    j
}

/// `(r x d) . I^-1 (r x d)`
pub(crate) fn angular_term(body: &Body, r: Vec3, direction: Vec3) -> f32 {
    let rxd = r.cross(direction);
    rxd.dot(body.mul_world_inverse_inertia(rxd))
}
