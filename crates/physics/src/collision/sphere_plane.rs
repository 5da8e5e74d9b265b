//! Sphere-plane collision detection

use super::Contact;
use crate::body::Body;
use crate::ground::GroundPlane;

/// Detect collision between a sphere-like body and the ground plane.
///
/// The reported normal is the plane normal, pointing out of the ground.
pub fn detect_sphere_plane_collision(sphere: &Body, plane: &GroundPlane) -> Option<Contact> {
    let radius = sphere.shape.radius();
    let lowest = sphere.position - plane.normal * radius;
    let depth = plane.penetration_depth(lowest);

    // dot(center, n) - d <= radius
    if depth < 0.0 {
        return None;
    }

    Some(Contact::new(
        lowest + plane.normal * depth,
        plane.normal,
        depth,
        &sphere.material,
        &plane.material(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use glam::Vec3;

    #[test]
    fn test_sphere_resting_on_plane() {
        let plane = GroundPlane::default();
        let sphere = Body::new(Shape::sphere(0.5), 1.0, Vec3::new(0.0, 0.5, 0.0));
        let contact = detect_sphere_plane_collision(&sphere, &plane).unwrap();
        assert!(contact.depth.abs() < 1e-6);
        assert_eq!(contact.normal, Vec3::Y);
    }

    #[test]
    fn test_sphere_above_plane() {
        let plane = GroundPlane::default();
        let sphere = Body::new(Shape::sphere(0.5), 1.0, Vec3::new(0.0, 0.6, 0.0));
        assert!(detect_sphere_plane_collision(&sphere, &plane).is_none());
    }

    #[test]
    fn test_raised_plane() {
        let plane = GroundPlane::new(Vec3::Y, 1.0);
        let sphere = Body::new(Shape::sphere(0.5), 1.0, Vec3::new(0.0, 1.25, 0.0));
        let contact = detect_sphere_plane_collision(&sphere, &plane).unwrap();
        assert!((contact.depth - 0.25).abs() < 1e-6);
        assert!((contact.point.y - 1.0).abs() < 1e-6);
    }
}
