//! # Collision Detection and Response
//!
//! Narrow-phase tests between body shapes and the ground plane, a dispatcher
//! routing shape pairs to the right test, and impulse-based response.
//! All pairs are tested; there is no broad phase.

mod box_box;
mod box_plane;
mod dispatcher;
mod response;
mod sphere_box;
mod sphere_plane;
mod sphere_sphere;

pub use box_box::detect_box_box_collision;
pub use box_plane::detect_box_plane_collision;
pub use dispatcher::CollisionDispatcher;
pub use response::resolve_contact;
pub(crate) use response::angular_term;
pub use sphere_box::detect_sphere_box_collision;
pub use sphere_plane::detect_sphere_plane_collision;
pub use sphere_sphere::detect_sphere_sphere_collision;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::Material;

/// Contact information for collision response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit contact normal, from body A towards body B
    pub normal: Vec3,
    /// Penetration depth, non-negative for a reported contact
    pub depth: f32,
    /// Combined friction coefficient
    pub friction: f32,
    /// Combined restitution coefficient
    pub restitution: f32,
}

impl Contact {
    /// Create a new contact with material properties
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3, depth: f32, mat_a: &Material, mat_b: &Material) -> Self {
        Self {
            point,
            normal,
            depth,
            friction: combine_friction(mat_a.friction, mat_b.friction),
            restitution: combine_restitution(mat_a.restitution, mat_b.restitution),
        }
    }

    /// The same contact seen from the other body.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Combine friction coefficients using geometric mean
fn combine_friction(f1: f32, f2: f32) -> f32 {
    (f1.max(0.0) * f2.max(0.0)).sqrt()
}

/// The less bouncy surface wins
fn combine_restitution(r1: f32, r2: f32) -> f32 {
    r1.min(r2)
}

/// Contact resolution tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Fraction of the penetration removed per contact, 0 to 1
    pub position_correction: f32,
    /// Penetration tolerated without positional correction
    pub penetration_slop: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            position_correction: 1.0,
            penetration_slop: 0.001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_combination() {
        let ice = Material::new(0.04, 0.9);
        let rubber = Material::new(1.0, 0.5);
        let contact = Contact::new(Vec3::ZERO, Vec3::Y, 0.1, &ice, &rubber);
        assert!((contact.friction - 0.2).abs() < 1e-6);
        assert!((contact.restitution - 0.5).abs() < 1e-6);
        assert_eq!(contact.flipped().normal, Vec3::NEG_Y);
    }
}
