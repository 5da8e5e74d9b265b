use tracing::debug;

use crate::body::Body;
use crate::constraint::Constraint;
use crate::storage::Slots;
use crate::types::{BodyHandle, ConstraintHandle};

/// Mark constraints whose bodies are gone as broken; returns how many.
pub(crate) fn invalidate_orphans(bodies: &Slots<Body>, constraints: &mut Slots<Constraint>) -> usize {
    let mut orphaned = 0;
    for (handle, constraint) in constraints.iter_mut::<ConstraintHandle>() {
        if constraint.is_broken() {
            continue;
        }
        let (a, b) = constraint.bodies();
        if !bodies.contains(a) || !bodies.contains(b) {
            debug!(?handle, "constraint lost a body, treating it as broken");
            constraint.mark_broken();
            orphaned += 1;
        }
    }
    orphaned
}

/// `begin_step` then `iterations` sequential passes in ascending handle order.
pub(crate) fn solve_constraints(
    bodies: &mut Slots<Body>,
    constraints: &mut Slots<Constraint>,
    dt: f32,
    iterations: u32,
) {
    for (_, constraint) in constraints.iter_mut::<ConstraintHandle>() {
        if !constraint.is_broken() {
            constraint.begin_step(dt);
        }
    }

    for _ in 0..iterations {
        for (_, constraint) in constraints.iter_mut::<ConstraintHandle>() {
            if constraint.is_broken() {
                continue;
            }
            let (a, b): (BodyHandle, BodyHandle) = constraint.bodies();
            if let Some((body_a, body_b)) = bodies.get2_mut(a, b) {
                constraint.solve(body_a, body_b, dt);
            }
        }
    }
}
