//! Collision shapes and the inertia tensors derived from them.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Point mass. Collides as a zero-radius sphere.
    Point,
    Sphere { radius: f32 },
    /// Oriented box given by its half extents in body space.
    Box { half_extents: Vec3 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Box,
}

impl Shape {
    #[must_use]
    pub const fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    #[must_use]
    pub const fn cuboid(half_extents: Vec3) -> Self {
        Shape::Box { half_extents }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point | Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Box { .. } => ShapeKind::Box,
        }
    }

    /// Radius used by sphere tests; zero for point masses.
    #[must_use]
    pub fn radius(&self) -> f32 {
        match self {
            Shape::Point => 0.0,
            Shape::Sphere { radius } => *radius,
            Shape::Box { half_extents } => half_extents.length(),
        }
    }

    /// Diagonal body-space inertia tensor for a body of the given mass.
    #[must_use]
    pub fn inertia(&self, mass: f32) -> Vec3 {
        match self {
            Shape::Point => point_inertia(),
            Shape::Sphere { radius } => sphere_inertia(mass, *radius),
            Shape::Box { half_extents } => box_inertia(mass, *half_extents),
        }
    }

    /// Furthest point of the shape along `direction`, in world space.
    #[must_use]
    pub fn support_point(&self, position: Vec3, orientation: Quat, direction: Vec3) -> Vec3 {
        match self {
            Shape::Point => position,
            Shape::Sphere { radius } => position + direction.normalize_or_zero() * *radius,
            Shape::Box { half_extents } => {
                let local_dir = orientation.inverse() * direction;
                let corner = Vec3::new(
                    half_extents.x * sign(local_dir.x),
                    half_extents.y * sign(local_dir.y),
                    half_extents.z * sign(local_dir.z),
                );
                position + orientation * corner
            }
        }
    }
}

/// Solid sphere: `2/5 m r^2` about every axis.
#[must_use]
pub fn sphere_inertia(mass: f32, radius: f32) -> Vec3 {
    Vec3::splat(0.4 * mass * radius * radius)
}

/// Solid cuboid from half extents: `m/3 (b^2 + c^2)` per axis.
#[must_use]
pub fn box_inertia(mass: f32, half_extents: Vec3) -> Vec3 {
    let sq = half_extents * half_extents;
    Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 3.0)
}

/// A point mass never rotates: infinite inertia, zero inverse inertia.
#[must_use]
pub fn point_inertia() -> Vec3 {
    Vec3::INFINITY
}

fn sign(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_inertia() {
        let i = box_inertia(6.0, Vec3::splat(0.5));
        // m/6 * side^2 for a cube
        assert!((i.x - 1.0).abs() < 1e-6);
        assert!((i.y - 1.0).abs() < 1e-6);
        assert!((i.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotated_box_support_point() {
        let shape = Shape::cuboid(Vec3::new(1.0, 0.5, 0.5));
        let q = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let p = shape.support_point(Vec3::ZERO, q, Vec3::NEG_Y);
        // the long axis now points along y
        assert!((p.y + 1.0).abs() < 1e-5, "p={p:?}");
    }
}
