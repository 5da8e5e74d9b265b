//! Oriented box-box collision via the separating axis test.
//!
//! Fifteen candidate axes are tested: the three face normals of each box and
//! the nine cross products of their edges. Nearly parallel edge pairs give a
//! degenerate cross product and are skipped. The axis of least overlap,
//! oriented from A to B, becomes the contact normal.

use glam::{Mat3, Vec3};

use super::Contact;
use crate::body::Body;
use crate::shapes::Shape;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Detect collision between two oriented boxes
pub fn detect_box_box_collision(box_a: &Body, box_b: &Body) -> Option<Contact> {
    let (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) = (box_a.shape, box_b.shape) else {
        return None;
    };

    let axes_a = Mat3::from_quat(box_a.orientation);
    let axes_b = Mat3::from_quat(box_b.orientation);
    let offset = box_b.position - box_a.position;

    let mut best_overlap = f32::INFINITY;
    let mut best_axis = Vec3::Y;

    let mut test_axis = |axis: Vec3| -> bool {
        let overlap = projected_radius(&axes_a, ha, axis) + projected_radius(&axes_b, hb, axis)
            - offset.dot(axis).abs();
        if overlap < 0.0 {
            return false;
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = if offset.dot(axis) < 0.0 { -axis } else { axis };
        }
        true
    };

    for i in 0..3 {
        if !test_axis(axes_a.col(i)) || !test_axis(axes_b.col(i)) {
            return None;
        }
    }

    for i in 0..3 {
        for j in 0..3 {
            let cross = axes_a.col(i).cross(axes_b.col(j));
            let len = cross.length();
            if len < PARALLEL_EPSILON {
                continue;
            }
            if !test_axis(cross / len) {
                return None;
            }
        }
    }

    // Deepest point of B against the normal, moved to the middle of the overlap
    let support = box_b
        .shape
        .support_point(box_b.position, box_b.orientation, -best_axis);
    let point = support + best_axis * (best_overlap * 0.5);

    Some(Contact::new(
        point,
        best_axis,
        best_overlap,
        &box_a.material,
        &box_b.material,
    ))
}

/// Half-length of a box's projection onto `axis`.
fn projected_radius(axes: &Mat3, half_extents: Vec3, axis: Vec3) -> f32 {
    half_extents.x * axes.x_axis.dot(axis).abs()
        + half_extents.y * axes.y_axis.dot(axis).abs()
        + half_extents.z * axes.z_axis.dot(axis).abs()
}
