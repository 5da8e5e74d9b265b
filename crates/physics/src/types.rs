use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::storage::SlotKey;
use crate::transform::to_transform_matrix;

/// Stable reference to a body owned by a [`crate::World`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

/// Stable reference to a constraint owned by a [`crate::World`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle {
    index: u32,
    generation: u32,
}

impl SlotKey for BodyHandle {
    fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
    fn index(self) -> u32 {
        self.index
    }
    fn generation(self) -> u32 {
        self.generation
    }
}

impl SlotKey for ConstraintHandle {
    fn from_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
    fn index(self) -> u32 {
        self.index
    }
    fn generation(self) -> u32 {
        self.generation
    }
}

/// Surface response coefficients of a body.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Coulomb friction coefficient.
    pub friction: f32,
    /// Coefficient of restitution (0 = plastic, 1 = elastic).
    pub restitution: f32,
}

impl Material {
    #[must_use]
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.3,
        }
    }
}

/// Axis-aligned region; bodies leaving it are removed from the world.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Energy totals of the last completed step. Diagnostics only.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EnergyReport {
    /// Linear plus rotational kinetic energy.
    pub kinetic: f32,
    /// Gravitational potential energy, `-m (g . x)` summed over dynamic bodies.
    pub potential: f32,
    /// Elastic energy stored in active constraints.
    pub stored: f32,
}

impl EnergyReport {
    #[must_use]
    pub fn total(&self) -> f32 {
        self.kinetic + self.potential + self.stored
    }
}

/// Counters describing the last call to [`crate::World::step`].
///
/// Contact counts are summed over substeps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Live bodies after the step.
    pub bodies: usize,
    pub active_constraints: usize,
    pub broken_this_step: usize,
    pub ground_contacts: usize,
    pub body_contacts: usize,
    /// Bodies frozen during this step because their state blew up.
    pub frozen_bodies: usize,
    /// Bodies removed for leaving the world bounds.
    pub removed_bodies: usize,
}

/// Record of one constraint fracture, kept until the host drains it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractureEvent {
    pub constraint: ConstraintHandle,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub point_a: Vec3,
    pub point_b: Vec3,
    pub impulse_a: Vec3,
    pub impulse_b: Vec3,
    /// Stored elastic energy at the moment of breaking.
    pub energy: f32,
}

/// Per-body render record, laid out for direct upload into a GPU buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodySnapshot {
    pub position: [f32; 3],
    pub flags: u32,
    /// Quaternion as `[x, y, z, w]`.
    pub orientation: [f32; 4],
    pub linear_velocity: [f32; 3],
    pub _pad: u32,
}

impl BodySnapshot {
    pub const FLAG_STATIC: u32 = 1;
    pub const FLAG_FROZEN: u32 = 1 << 1;

    #[must_use]
    pub fn from_body(body: &Body) -> Self {
        let mut flags = 0;
        if body.is_static() {
            flags |= Self::FLAG_STATIC;
        }
        if body.is_frozen() {
            flags |= Self::FLAG_FROZEN;
        }
        Self {
            position: body.position.to_array(),
            flags,
            orientation: body.orientation.to_array(),
            linear_velocity: body.linear_velocity.to_array(),
            _pad: 0,
        }
    }

    /// Column-major model matrix for this pose.
    #[must_use]
    pub fn transform_matrix(&self) -> [[f32; 4]; 4] {
        to_transform_matrix(Vec3::from_array(self.position), Quat::from_array(self.orientation))
    }
}

/// Per-constraint debug line record.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LinkSnapshot {
    pub start: [f32; 3],
    /// Current break metric over its threshold; 1.0 means about to break.
    pub stress: f32,
    pub end: [f32; 3],
    pub broken: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;

    #[test]
    fn snapshot_flags_and_bytes() {
        let mut body = Body::new(Shape::sphere(0.5), 1.0, Vec3::new(1.0, 2.0, 3.0));
        body.freeze();
        let snapshot = BodySnapshot::from_body(&body);
        assert_eq!(snapshot.flags, BodySnapshot::FLAG_FROZEN);
        assert_eq!(snapshot.transform_matrix()[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(bytemuck::bytes_of(&snapshot).len(), 48);

        let anchor = BodySnapshot::from_body(&Body::fixed(Shape::Point, Vec3::ZERO));
        assert_eq!(anchor.flags, BodySnapshot::FLAG_STATIC);
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = Bounds {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        };
        assert!(bounds.contains(Vec3::ONE));
        assert!(!bounds.contains(Vec3::new(0.5, 1.5, 0.5)));
    }
}
