use std::collections::BTreeMap;

use glam::Vec3;
use tracing::{debug, info};

use crate::body::Body;
use crate::constraint::{Constraint, FractureImpulse};
use crate::storage::Slots;
use crate::types::{BodyHandle, ConstraintHandle, FractureEvent};
use crate::world::FractureConfig;

/// Net fracture impulse on one body, applied at the impulse-weighted anchor.
#[derive(Default)]
struct Accumulated {
    impulse: Vec3,
    weighted_point: Vec3,
    weight: f32,
    /// First anchor seen, used when every impulse was zero.
    fallback_point: Option<Vec3>,
}

impl Accumulated {
    fn add(&mut self, impulse: Vec3, point: Vec3) {
        let weight = impulse.length();
        self.impulse += impulse;
        self.weighted_point += point * weight;
        self.weight += weight;
        self.fallback_point.get_or_insert(point);
    }

    fn point(&self) -> Vec3 {
        if self.weight > 0.0 {
            self.weighted_point / self.weight
        } else {
            self.fallback_point.unwrap_or(Vec3::ZERO)
        }
    }
}

/// Break every constraint whose criterion trips and release its energy.
///
/// All breaking constraints are evaluated against the same body state before
/// any impulse is applied.
pub(crate) fn process_fractures(
    bodies: &mut Slots<Body>,
    constraints: &mut Slots<Constraint>,
    config: &FractureConfig,
) -> Vec<FractureEvent> {
    // Read phase
    let mut pending: Vec<(ConstraintHandle, BodyHandle, BodyHandle, FractureImpulse)> = Vec::new();
    for (handle, constraint) in constraints.iter::<ConstraintHandle>() {
        if constraint.is_broken() {
            continue;
        }
        let (a, b) = constraint.bodies();
        let (Some(body_a), Some(body_b)) = (bodies.get(a), bodies.get(b)) else {
            continue;
        };
        if constraint.should_break(body_a, body_b) {
            let impulse = constraint.fracture_impulse(body_a, body_b, config.energy_transfer_ratio, config.max_delta_v);
            pending.push((handle, a, b, impulse));
        }
    }
    if pending.is_empty() {
        return Vec::new();
    }

    // Write phase
    let mut totals: BTreeMap<BodyHandle, Accumulated> = BTreeMap::new();
    let mut events = Vec::with_capacity(pending.len());
    for (handle, a, b, fracture) in pending {
        if let Some(constraint) = constraints.get_mut(handle) {
            constraint.mark_broken();
        }
        debug!(
            ?handle,
            energy = fracture.energy,
            impulse_a = ?fracture.impulse_a,
            impulse_b = ?fracture.impulse_b,
            "constraint fractured"
        );

        if config.accumulate {
            totals.entry(a).or_default().add(fracture.impulse_a, fracture.point_a);
            totals.entry(b).or_default().add(fracture.impulse_b, fracture.point_b);
        } else {
            if let Some(body) = bodies.get_mut(a) {
                body.apply_impulse(fracture.impulse_a, fracture.point_a);
            }
            if let Some(body) = bodies.get_mut(b) {
                body.apply_impulse(fracture.impulse_b, fracture.point_b);
            }
        }

        events.push(FractureEvent {
            constraint: handle,
            body_a: a,
            body_b: b,
            point_a: fracture.point_a,
            point_b: fracture.point_b,
            impulse_a: fracture.impulse_a,
            impulse_b: fracture.impulse_b,
            energy: fracture.energy,
        });
    }

    for (handle, total) in &totals {
        if let Some(body) = bodies.get_mut(*handle) {
            body.apply_impulse(total.impulse, total.point());
        }
    }

    let released: f32 = events.iter().map(|e| e.energy).sum();
    info!(count = events.len(), released, "constraints fractured");
    events
}
