use tracing::warn;

use crate::body::Body;
use crate::integrator::{apply_forces, integrate_pose, ForceField, IntegrationOutcome};
use crate::storage::Slots;
use crate::types::BodyHandle;

pub(crate) fn apply_external_forces(bodies: &mut Slots<Body>, field: &ForceField, dt: f32) {
    for (_, body) in bodies.iter_mut::<BodyHandle>() {
        apply_forces(body, field, dt);
    }
}

/// Integrate every pose; returns how many bodies were frozen.
pub(crate) fn integrate_bodies(bodies: &mut Slots<Body>, dt: f32) -> usize {
    let mut frozen = 0;
    for (handle, body) in bodies.iter_mut::<BodyHandle>() {
        if integrate_pose(body, dt) == IntegrationOutcome::Frozen {
            warn!(?handle, position = ?body.position, "non-finite body state, freezing body");
            frozen += 1;
        }
    }
    frozen
}
