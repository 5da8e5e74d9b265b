//! Box-plane collision detection

use super::Contact;
use crate::body::Body;
use crate::ground::GroundPlane;

/// Detect collision between an oriented box and the ground plane
pub fn detect_box_plane_collision(box_body: &Body, plane: &GroundPlane) -> Option<Contact> {
    // Deepest corner: the support point against the plane normal
    let support_point = box_body
        .shape
        .support_point(box_body.position, box_body.orientation, -plane.normal);
    let depth = plane.penetration_depth(support_point);

    if depth < 0.0 {
        return None;
    }

    // Contact point is the projection of the support point onto the plane
    Some(Contact::new(
        support_point + plane.normal * depth,
        plane.normal,
        depth,
        &box_body.material,
        &plane.material(),
    ))
}
