use std::collections::HashSet;

use crate::body::Body;
use crate::collision::{resolve_contact, CollisionConfig, CollisionDispatcher};
use crate::ground::GroundPlane;
use crate::storage::Slots;
use crate::types::BodyHandle;

use super::pair_key;

/// Returns the number of bodies touching the ground.
pub(crate) fn resolve_ground_contacts(bodies: &mut Slots<Body>, ground: &GroundPlane) -> usize {
    let mut touching = 0;
    for (_, body) in bodies.iter_mut::<BodyHandle>() {
        if ground.apply_collision(body) {
            touching += 1;
        }
    }
    touching
}

/// All-pairs narrow phase; returns the number of contacts found.
///
/// Pairs listed in `excluded` (keyed by [`pair_key`]) and pairs of two
/// immovable bodies are skipped.
pub(crate) fn resolve_body_contacts(
    bodies: &mut Slots<Body>,
    dispatcher: &CollisionDispatcher,
    config: &CollisionConfig,
    excluded: &HashSet<(BodyHandle, BodyHandle)>,
) -> usize {
    let handles: Vec<BodyHandle> = bodies.keys();
    let mut contacts = 0;
    for (i, &a) in handles.iter().enumerate() {
        for &b in &handles[i + 1..] {
            if excluded.contains(&pair_key(a, b)) {
                continue;
            }
            let Some((body_a, body_b)) = bodies.get2_mut(a, b) else {
                continue;
            };
            if body_a.is_immovable() && body_b.is_immovable() {
                continue;
            }
            if let Some(contact) = dispatcher.detect(body_a, body_b) {
                resolve_contact(body_a, body_b, &contact, config);
                contacts += 1;
            }
        }
    }
    contacts
}
