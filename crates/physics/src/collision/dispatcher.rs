//! Collision detection dispatcher that routes to appropriate algorithms

use std::collections::HashMap;

use super::{detect_box_box_collision, detect_sphere_box_collision, detect_sphere_sphere_collision, Contact};
use crate::body::Body;
use crate::shapes::ShapeKind;

/// Function type for collision detection between two bodies
type CollisionDetector = fn(&Body, &Body) -> Option<Contact>;

/// Registered detector, plus whether the arguments must be swapped
#[derive(Clone, Copy)]
struct Entry {
    detector: CollisionDetector,
    flipped: bool,
}

/// Collision detection dispatcher that routes to appropriate algorithms
pub struct CollisionDispatcher {
    /// Detection functions indexed by shape pairs
    detectors: HashMap<(ShapeKind, ShapeKind), Entry>,
}

impl CollisionDispatcher {
    /// Create a new collision dispatcher with all detection algorithms registered
    #[must_use]
    pub fn new() -> Self {
        let mut dispatcher = Self {
            detectors: HashMap::new(),
        };
        dispatcher.register(ShapeKind::Sphere, ShapeKind::Sphere, detect_sphere_sphere_collision);
        dispatcher.register(ShapeKind::Sphere, ShapeKind::Box, detect_sphere_box_collision);
        dispatcher.register(ShapeKind::Box, ShapeKind::Box, detect_box_box_collision);
        dispatcher
    }

    /// Register a detector for a pair of shapes; the mirrored pair reuses it
    fn register(&mut self, kind_a: ShapeKind, kind_b: ShapeKind, detector: CollisionDetector) {
        self.detectors.insert(
            (kind_a, kind_b),
            Entry {
                detector,
                flipped: false,
            },
        );
        if kind_a != kind_b {
            self.detectors.insert(
                (kind_b, kind_a),
                Entry {
                    detector,
                    flipped: true,
                },
            );
        }
    }

    /// Detect collision between two bodies; the normal always points from `a` to `b`
    #[must_use]
    pub fn detect(&self, a: &Body, b: &Body) -> Option<Contact> {
        let entry = self.detectors.get(&(a.shape.kind(), b.shape.kind()))?;
        if entry.flipped {
            (entry.detector)(b, a).map(Contact::flipped)
        } else {
            (entry.detector)(a, b)
        }
    }
}

impl Default for CollisionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
