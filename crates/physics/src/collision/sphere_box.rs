//! Sphere-box collision detection

use glam::Vec3;

use super::Contact;
use crate::body::Body;
use crate::shapes::Shape;

/// Detect collision between a sphere-like body and an oriented box.
///
/// The normal points from the sphere towards the box.
pub fn detect_sphere_box_collision(sphere: &Body, box_body: &Body) -> Option<Contact> {
    let Shape::Box { half_extents } = box_body.shape else {
        return None;
    };
    let radius = sphere.shape.radius();

    // Work in the box frame
    let local = box_body.orientation.inverse() * (sphere.position - box_body.position);
    let closest = local.clamp(-half_extents, half_extents);
    let delta = closest - local;
    let distance = delta.length();

    if distance > radius {
        return None;
    }

    let (normal_local, depth, point_local) = if distance > 1e-6 {
        (delta / distance, radius - distance, closest)
    } else {
        // Centre inside the box: leave through the nearest face
        let (face_normal, face_gap) = nearest_face(local, half_extents);
        (-face_normal, radius + face_gap, local + face_normal * face_gap)
    };

    Some(Contact::new(
        box_body.position + box_body.orientation * point_local,
        box_body.orientation * normal_local,
        depth,
        &sphere.material,
        &box_body.material,
    ))
}

/// Outward normal of the face closest to `local`, and the distance to it.
fn nearest_face(local: Vec3, half_extents: Vec3) -> (Vec3, f32) {
    let gaps = half_extents - local.abs();
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };

    if gaps.x <= gaps.y && gaps.x <= gaps.z {
        (Vec3::new(sign(local.x), 0.0, 0.0), gaps.x)
    } else if gaps.y <= gaps.z {
        (Vec3::new(0.0, sign(local.y), 0.0), gaps.y)
    } else {
        (Vec3::new(0.0, 0.0, sign(local.z)), gaps.z)
    }
}
