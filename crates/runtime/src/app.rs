//! # Headless Loop
//!
//! Steps a [`World`] for a fixed number of ticks, reporting progress through
//! `tracing`.

use shatter_physics::World;
use tracing::{debug, info, warn};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub steps: u32,
    pub dt: f32,
    /// Log a progress line every this many steps; zero disables it.
    pub report_every: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps: 600,
            dt: 1.0 / 60.0,
            report_every: 60,
        }
    }
}

/// Totals over a whole run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub steps: u32,
    pub fractures: usize,
    pub frozen_bodies: usize,
    pub removed_bodies: usize,
    pub released_energy: f32,
    pub final_energy: f32,
}

/// Run `options.steps` fixed steps of `world`.
pub fn run(world: &mut World, options: &RunOptions) -> RunSummary {
    info!(
        bodies = world.body_count(),
        constraints = world.active_constraint_count(),
        steps = options.steps,
        dt = options.dt,
        "starting simulation"
    );

    let mut summary = RunSummary::default();
    for i in 0..options.steps {
        let stats = world.step(options.dt);
        summary.steps += 1;
        summary.frozen_bodies += stats.frozen_bodies;
        summary.removed_bodies += stats.removed_bodies;

        for event in world.drain_fracture_events() {
            debug!(
                constraint = ?event.constraint,
                energy = event.energy,
                point = ?event.point_a,
                "fracture"
            );
            summary.fractures += 1;
            summary.released_energy += event.energy;
        }
        if stats.frozen_bodies > 0 {
            warn!(step = i + 1, frozen = stats.frozen_bodies, "bodies frozen this step");
        }

        if options.report_every > 0 && (i + 1) % options.report_every == 0 {
            let energy = world.energy();
            info!(
                step = i + 1,
                time = world.time(),
                kinetic = energy.kinetic,
                potential = energy.potential,
                stored = energy.stored,
                links = stats.active_constraints,
                contacts = stats.ground_contacts + stats.body_contacts,
                "progress"
            );
        }
    }

    summary.final_energy = world.energy().total();
    info!(
        fractures = summary.fractures,
        released = summary.released_energy,
        final_energy = summary.final_energy,
        "simulation finished"
    );
    summary
}
