//! Rigid bodies and point masses.
//!
//! A [`Body`] carries pose, velocity and mass properties. Inverse mass and
//! inverse inertia are always derived from [`MassProperties`], so they can
//! never go stale after a mass change.

use glam::{Quat, Vec3};

use crate::shapes::Shape;
use crate::transform::{integrate_orientation, mul_world_inverse_inertia};
use crate::types::Material;

/// Smallest mass or inertia component a dynamic body may have. Infinite
/// inertia is kept and locks rotation about that axis.
pub const MASS_EPSILON: f32 = 1e-6;

/// Whether a body responds to forces at all.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MassProperties {
    Dynamic {
        mass: f32,
        /// Diagonal body-space inertia tensor.
        inertia: Vec3,
    },
    /// Pinned body with infinite mass.
    Static,
}

impl MassProperties {
    /// Dynamic mass properties with degenerate values clamped to epsilon.
    #[must_use]
    pub fn dynamic(mass: f32, inertia: Vec3) -> Self {
        MassProperties::Dynamic {
            mass: clamp_positive(mass),
            inertia: Vec3::new(
                clamp_positive(inertia.x),
                clamp_positive(inertia.y),
                clamp_positive(inertia.z),
            ),
        }
    }

    /// Dynamic mass properties with the inertia tensor of `shape`.
    #[must_use]
    pub fn from_shape(mass: f32, shape: &Shape) -> Self {
        let mass = clamp_positive(mass);
        Self::dynamic(mass, shape.inertia(mass))
    }

    #[must_use]
    pub fn inverse_mass(&self) -> f32 {
        match self {
            MassProperties::Dynamic { mass, .. } => 1.0 / mass,
            MassProperties::Static => 0.0,
        }
    }

    #[must_use]
    pub fn inverse_inertia(&self) -> Vec3 {
        match self {
            MassProperties::Dynamic { inertia, .. } => inertia.recip(),
            MassProperties::Static => Vec3::ZERO,
        }
    }
}

fn clamp_positive(v: f32) -> f32 {
    // NaN fails the comparison and is clamped too
    if v > MASS_EPSILON {
        v
    } else {
        MASS_EPSILON
    }
}

#[derive(Clone, Debug)]
pub struct Body {
    pub position: Vec3,
    /// Unit quaternion; renormalized after every integration.
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    /// World-space angular velocity in rad/s.
    pub angular_velocity: Vec3,
    /// Local-space offset of the center of mass from `position`.
    pub center_of_mass: Vec3,
    pub shape: Shape,
    pub material: Material,
    mass_properties: MassProperties,
    frozen: bool,
    force: Vec3,
    torque: Vec3,
}

impl Body {
    /// Dynamic body with the inertia of `shape`.
    #[must_use]
    pub fn new(shape: Shape, mass: f32, position: Vec3) -> Self {
        Self::with_mass_properties(shape, MassProperties::from_shape(mass, &shape), position)
    }

    /// Immovable body, e.g. the pinned end of a chain.
    #[must_use]
    pub fn fixed(shape: Shape, position: Vec3) -> Self {
        Self::with_mass_properties(shape, MassProperties::Static, position)
    }

    #[must_use]
    pub fn with_mass_properties(shape: Shape, mass_properties: MassProperties, position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            center_of_mass: Vec3::ZERO,
            shape,
            material: Material::default(),
            mass_properties,
            frozen: false,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn mass_properties(&self) -> MassProperties {
        self.mass_properties
    }

    /// Replace the mass, keeping the shape-derived inertia in sync.
    pub fn set_mass(&mut self, mass: f32) {
        if let MassProperties::Dynamic { .. } = self.mass_properties {
            self.mass_properties = MassProperties::from_shape(mass, &self.shape);
        }
    }

    pub fn set_mass_properties(&mut self, mass_properties: MassProperties) {
        self.mass_properties = match mass_properties {
            MassProperties::Dynamic { mass, inertia } => MassProperties::dynamic(mass, inertia),
            MassProperties::Static => MassProperties::Static,
        };
    }

    /// Mass in kg; infinite for static bodies.
    #[must_use]
    pub fn mass(&self) -> f32 {
        match self.mass_properties {
            MassProperties::Dynamic { mass, .. } => mass,
            MassProperties::Static => f32::INFINITY,
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self.mass_properties, MassProperties::Static)
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Static and frozen bodies take no impulses and never move.
    #[must_use]
    pub fn is_immovable(&self) -> bool {
        self.frozen || self.is_static()
    }

    #[must_use]
    pub fn inverse_mass(&self) -> f32 {
        if self.frozen {
            0.0
        } else {
            self.mass_properties.inverse_mass()
        }
    }

    #[must_use]
    pub fn inverse_inertia(&self) -> Vec3 {
        if self.frozen {
            Vec3::ZERO
        } else {
            self.mass_properties.inverse_inertia()
        }
    }

    /// `I_world^-1 * v`.
    #[must_use]
    pub fn mul_world_inverse_inertia(&self, v: Vec3) -> Vec3 {
        mul_world_inverse_inertia(self.orientation, self.inverse_inertia(), v)
    }

    #[must_use]
    pub fn local_to_world(&self, local_point: Vec3) -> Vec3 {
        self.position + self.orientation * local_point
    }

    #[must_use]
    pub fn center_of_mass_world(&self) -> Vec3 {
        self.local_to_world(self.center_of_mass)
    }

    /// `v + w x (p - com)`.
    #[must_use]
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        let r = point - self.center_of_mass_world();
        self.linear_velocity + self.angular_velocity.cross(r)
    }

    /// Apply impulse `impulse` at world point `point`.
    pub fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) {
        if self.is_immovable() {
            return;
        }
        self.linear_velocity += impulse * self.inverse_mass();
        let r = point - self.center_of_mass_world();
        self.angular_velocity += self.mul_world_inverse_inertia(r.cross(impulse));
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if self.is_immovable() {
            return;
        }
        self.angular_velocity += self.mul_world_inverse_inertia(impulse);
    }

    /// Queue a force for the next step; cleared once the step completes.
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    #[must_use]
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    #[must_use]
    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Full semi-implicit Euler step: velocities first, then pose.
    pub fn integrate(&mut self, force: Vec3, torque: Vec3, dt: f32) {
        self.integrate_velocity(force, torque, dt);
        self.integrate_position(dt);
    }

    /// `v += F/m dt`, `w += I_world^-1 tau dt`.
    pub fn integrate_velocity(&mut self, force: Vec3, torque: Vec3, dt: f32) {
        if self.is_immovable() {
            return;
        }
        self.linear_velocity += force * self.inverse_mass() * dt;
        self.angular_velocity += self.mul_world_inverse_inertia(torque) * dt;
    }

    /// Move the centre of mass by `v dt` and rotate about it, then place the
    /// body origin back relative to the new orientation.
    pub fn integrate_position(&mut self, dt: f32) {
        if self.is_immovable() {
            return;
        }
        let com = self.center_of_mass_world() + self.linear_velocity * dt;
        if self.angular_velocity != Vec3::ZERO {
            self.orientation = integrate_orientation(self.orientation, self.angular_velocity, dt);
        }
        self.position = com - self.orientation * self.center_of_mass;
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
    }

    /// Stop simulating this body: zero its velocities and mark it frozen.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.clear_accumulators();
    }

    /// Linear plus rotational kinetic energy. Zero for static bodies.
    #[must_use]
    pub fn kinetic_energy(&self) -> f32 {
        match self.mass_properties {
            MassProperties::Dynamic { mass, inertia } => {
                let omega_local = self.orientation.inverse() * self.angular_velocity;
                let rotational: f32 = (0..3)
                    .filter(|&i| inertia[i].is_finite())
                    .map(|i| inertia[i] * omega_local[i] * omega_local[i])
                    .sum();
                0.5 * mass * self.linear_velocity.length_squared() + 0.5 * rotational
            }
            MassProperties::Static => 0.0,
        }
    }
}
