//! Stages of one substep, run in order by [`crate::World::step`].

pub(crate) mod constraints;
pub(crate) mod contact;
pub(crate) mod energy;
pub(crate) mod fracture;
pub(crate) mod integration;

use crate::types::BodyHandle;

/// Order-independent key for a pair of bodies.
pub(crate) fn pair_key(a: BodyHandle, b: BodyHandle) -> (BodyHandle, BodyHandle) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
