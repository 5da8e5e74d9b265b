//! Infinite ground half-space.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::collision::{detect_box_plane_collision, detect_sphere_plane_collision, Contact};
use crate::shapes::ShapeKind;
use crate::transform::{normalize_or, FALLBACK_AXIS};
use crate::types::Material;

/// Plane `dot(normal, p) = distance`; everything below it is solid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundPlane {
    pub normal: Vec3,
    pub distance: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Approach speeds below this are absorbed instead of bounced.
    pub resting_speed: f32,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            distance: 0.0,
            restitution: 0.3,
            friction: 0.5,
            resting_speed: 0.2,
        }
    }
}

impl GroundPlane {
    #[must_use]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normalize_or(normal, FALLBACK_AXIS),
            distance,
            ..Self::default()
        }
    }

    /// Positive when `point` is below the plane.
    #[must_use]
    pub fn penetration_depth(&self, point: Vec3) -> f32 {
        self.distance - self.normal.dot(point)
    }

    #[must_use]
    pub fn material(&self) -> Material {
        Material::new(self.friction, self.restitution)
    }

    /// Contact between `body` and the ground, normal pointing out of the ground.
    #[must_use]
    pub fn contact(&self, body: &Body) -> Option<Contact> {
        match body.shape.kind() {
            ShapeKind::Sphere => detect_sphere_plane_collision(body, self),
            ShapeKind::Box => detect_box_plane_collision(body, self),
        }
    }

    /// Push `body` out of the ground and damp its velocity.
    ///
    /// The plane's own restitution and friction are used, not the body's.
    /// Returns whether the body was touching the ground.
    pub fn apply_collision(&self, body: &mut Body) -> bool {
        if body.is_immovable() {
            return false;
        }
        let Some(contact) = self.contact(body) else {
            return false;
        };

        body.position += self.normal * contact.depth;

        let velocity_along_normal = body.linear_velocity.dot(self.normal);
        if velocity_along_normal < 0.0 {
            let tangent_velocity = body.linear_velocity - self.normal * velocity_along_normal;
            let bounce = if -velocity_along_normal < self.resting_speed {
                0.0
            } else {
                -velocity_along_normal * self.restitution
            };
            body.linear_velocity = self.normal * bounce + tangent_velocity * (1.0 - self.friction);
            body.angular_velocity *= 1.0 - self.friction * 0.5;
        }
        true
    }
}
