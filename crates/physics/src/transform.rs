//! Vector and quaternion helpers shared by the solver, plus conversions from
//! body pose (position + quaternion) to the 4x4 matrices a renderer consumes.

use glam::{Mat4, Quat, Vec3};

/// Direction used whenever a unit vector is requested from a degenerate input.
pub const FALLBACK_AXIS: Vec3 = Vec3::Y;

/// Normalize `v`, or return `fallback` when it is too short to have a direction.
#[must_use]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len > 1e-8 && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// `R * diag(inv_inertia) * R^T * v`: apply a world-space inverse inertia
/// tensor given the body-space diagonal and the body orientation.
#[must_use]
pub fn mul_world_inverse_inertia(orientation: Quat, inv_inertia: Vec3, v: Vec3) -> Vec3 {
    let local = orientation.inverse() * v;
    orientation * (local * inv_inertia)
}

/// Advance `q` by angular velocity `omega` over `dt` using `dq = 0.5 (w,0) q`.
#[must_use]
pub fn integrate_orientation(q: Quat, omega: Vec3, dt: f32) -> Quat {
    let spin = Quat::from_xyzw(omega.x, omega.y, omega.z, 0.0) * q;
    (q + spin * (0.5 * dt)).normalize()
}

/// Convert position and quaternion to a column-major 4x4 transform.
#[must_use]
pub fn to_transform_matrix(position: Vec3, orientation: Quat) -> [[f32; 4]; 4] {
    Mat4::from_rotation_translation(orientation, position).to_cols_array_2d()
}

/// Same as [`to_transform_matrix`] with a per-axis scale, e.g. box extents.
#[must_use]
pub fn to_transform_matrix_scaled(position: Vec3, orientation: Quat, scale: Vec3) -> [[f32; 4]; 4] {
    Mat4::from_scale_rotation_translation(scale, orientation, position).to_cols_array_2d()
}
