//! # World Builder
//!
//! Descriptors and helpers for populating a [`World`]: bodies are described
//! with [`BodyDesc`], constraints are wired between existing bodies with
//! [`World::create_constraint`].

use glam::{Quat, Vec3};

use crate::body::{Body, MassProperties};
use crate::constraint::{Constraint, ConstraintParams};
use crate::error::PhysicsError;
use crate::shapes::Shape;
use crate::types::{BodyHandle, ConstraintHandle, Material};
use crate::World;

/// Everything needed to spawn one body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    /// `None` makes the body static.
    pub mass: Option<f32>,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub material: Material,
    pub center_of_mass: Vec3,
}

impl BodyDesc {
    #[must_use]
    pub fn dynamic(shape: Shape, mass: f32) -> Self {
        Self {
            shape,
            mass: Some(mass),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            material: Material::default(),
            center_of_mass: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn fixed(shape: Shape) -> Self {
        Self {
            mass: None,
            ..Self::dynamic(shape, 0.0)
        }
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    #[must_use]
    pub fn with_center_of_mass(mut self, offset: Vec3) -> Self {
        self.center_of_mass = offset;
        self
    }

    #[must_use]
    pub fn build(self) -> Body {
        let mass_properties = match self.mass {
            Some(mass) => MassProperties::from_shape(mass, &self.shape),
            None => MassProperties::Static,
        };
        let mut body = Body::with_mass_properties(self.shape, mass_properties, self.position);
        body.orientation = self.orientation;
        body.material = self.material;
        body.center_of_mass = self.center_of_mass;
        if mass_properties != MassProperties::Static {
            body.linear_velocity = self.linear_velocity;
            body.angular_velocity = self.angular_velocity;
        }
        body
    }
}

/// Where a constraint attaches to its two bodies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConstraintAnchors {
    /// Both body origins.
    Centers,
    /// Offsets in each body's own frame.
    Local { a: Vec3, b: Vec3 },
    /// One shared world point, e.g. the face between two fragments.
    World(Vec3),
    /// Separate world points on each body.
    WorldPair { a: Vec3, b: Vec3 },
}

/// Rest length of a new constraint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RestLength {
    /// Current anchor distance, so the link starts relaxed.
    Current,
    Fixed(f32),
}

fn world_to_local(body: &Body, point: Vec3) -> Vec3 {
    body.orientation.inverse() * (point - body.position)
}

/// Builder methods for adding bodies and constraints to the world
impl World {
    pub fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.add_body(desc.build())
    }

    /// Add a solid sphere with default material properties
    pub fn add_sphere(&mut self, position: Vec3, radius: f32, mass: f32) -> BodyHandle {
        self.create_body(BodyDesc::dynamic(Shape::sphere(radius), mass).at(position))
    }

    /// Add a solid box given its half extents
    pub fn add_box(&mut self, position: Vec3, half_extents: Vec3, mass: f32) -> BodyHandle {
        self.create_body(BodyDesc::dynamic(Shape::cuboid(half_extents), mass).at(position))
    }

    pub fn add_point_mass(&mut self, position: Vec3, mass: f32) -> BodyHandle {
        self.create_body(BodyDesc::dynamic(Shape::Point, mass).at(position))
    }

    /// Link two existing bodies.
    ///
    /// # Errors
    ///
    /// Fails with [`PhysicsError::UnknownBody`] or
    /// [`PhysicsError::SelfConstraint`] for an invalid pair.
    pub fn create_constraint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        anchors: ConstraintAnchors,
        params: ConstraintParams,
        rest_length: RestLength,
    ) -> Result<ConstraintHandle, PhysicsError> {
        self.check_pair(a, b)?;
        let (body_a, body_b) = match (self.body(a), self.body(b)) {
            (Some(body_a), Some(body_b)) => (body_a, body_b),
            (None, _) => return Err(PhysicsError::UnknownBody(a)),
            (_, None) => return Err(PhysicsError::UnknownBody(b)),
        };

        let (local_a, local_b) = match anchors {
            ConstraintAnchors::Centers => (Vec3::ZERO, Vec3::ZERO),
            ConstraintAnchors::Local { a, b } => (a, b),
            ConstraintAnchors::World(point) => (world_to_local(body_a, point), world_to_local(body_b, point)),
            ConstraintAnchors::WorldPair { a, b } => (world_to_local(body_a, a), world_to_local(body_b, b)),
        };
        let rest = match rest_length {
            RestLength::Current => body_a.local_to_world(local_a).distance(body_b.local_to_world(local_b)),
            RestLength::Fixed(length) => length,
        };

        self.add_constraint(Constraint::new(a, b, local_a, local_b, rest, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldConfig;

    #[test]
    fn desc_builds_requested_body() {
        let body = BodyDesc::dynamic(Shape::cuboid(Vec3::splat(0.5)), 6.0)
            .at(Vec3::new(0.0, 2.0, 0.0))
            .with_velocity(Vec3::X)
            .with_material(Material::new(0.9, 0.1))
            .build();
        assert_eq!(body.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(body.linear_velocity, Vec3::X);
        assert!((body.mass() - 6.0).abs() < 1e-6);
        assert!((body.material.friction - 0.9).abs() < 1e-6);

        let fixed = BodyDesc::fixed(Shape::Point).with_velocity(Vec3::X).build();
        assert!(fixed.is_static());
        assert_eq!(fixed.linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn shared_world_anchor_starts_relaxed() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let a = world.add_box(Vec3::ZERO, Vec3::splat(0.5), 1.0);
        let b = world.add_box(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5), 1.0);
        let link = world
            .create_constraint(
                a,
                b,
                ConstraintAnchors::World(Vec3::new(0.5, 0.0, 0.0)),
                ConstraintParams::rigid(),
                RestLength::Current,
            )
            .unwrap();
        let constraint = world.constraint(link).unwrap();
        assert!(constraint.rest_length().abs() < 1e-6);
        assert_eq!(constraint.local_anchors(), (Vec3::new(0.5, 0.0, 0.0), Vec3::new(-0.5, 0.0, 0.0)));
    }

    #[test]
    fn fixed_rest_length_is_kept() {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let top = world.add_anchor(Vec3::new(0.0, 5.0, 0.0));
        let node = world.add_point_mass(Vec3::new(0.0, 4.85, 0.0), 0.08);
        let link = world
            .create_constraint(top, node, ConstraintAnchors::Centers, ConstraintParams::spring(600.0, 0.1), RestLength::Fixed(0.15))
            .unwrap();
        assert!((world.constraint(link).unwrap().rest_length() - 0.15).abs() < 1e-6);
        assert_eq!(
            world.create_constraint(top, top, ConstraintAnchors::Centers, ConstraintParams::rigid(), RestLength::Current),
            Err(PhysicsError::SelfConstraint(top))
        );
    }
}
