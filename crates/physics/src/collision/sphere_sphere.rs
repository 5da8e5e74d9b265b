//! Sphere-sphere collision detection

use super::Contact;
use crate::body::Body;
use crate::transform::{normalize_or, FALLBACK_AXIS};

/// Detect collision between two sphere-like bodies (points are zero-radius spheres)
pub fn detect_sphere_sphere_collision(sphere_a: &Body, sphere_b: &Body) -> Option<Contact> {
    let (ra, rb) = (sphere_a.shape.radius(), sphere_b.shape.radius());
    let delta = sphere_b.position - sphere_a.position;
    let distance = delta.length();
    let min_distance = ra + rb;

    if distance > min_distance {
        return None;
    }

    // Coincident centres push along +Y
    let normal = normalize_or(delta, FALLBACK_AXIS);
    let depth = min_distance - distance;
    let contact_point = sphere_a.position + normal * (ra - depth * 0.5);

    Some(Contact::new(
        contact_point,
        normal,
        depth,
        &sphere_a.material,
        &sphere_b.material,
    ))
}
