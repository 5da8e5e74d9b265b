use glam::Vec3;

use crate::body::Body;
use crate::constraint::Constraint;
use crate::storage::Slots;
use crate::types::{BodyHandle, ConstraintHandle, EnergyReport};

/// Kinetic, gravitational and stored elastic energy. Diagnostic only.
pub(crate) fn measure_energy(bodies: &Slots<Body>, constraints: &mut Slots<Constraint>, gravity: Vec3) -> EnergyReport {
    let mut report = EnergyReport::default();
    for (_, body) in bodies.iter::<BodyHandle>() {
        if body.is_static() {
            continue;
        }
        report.kinetic += body.kinetic_energy();
        report.potential -= body.mass() * gravity.dot(body.center_of_mass_world());
    }
    for (_, constraint) in constraints.iter_mut::<ConstraintHandle>() {
        let (a, b) = constraint.bodies();
        if let (Some(body_a), Some(body_b)) = (bodies.get(a), bodies.get(b)) {
            report.stored += constraint.refresh_stored_energy(body_a, body_b);
        }
    }
    report
}
