use shatter_physics::WorldConfig;
use shatter_runtime::app::{run, RunOptions};
use shatter_runtime::scenario::{build, Scenario, SceneOverrides};

fn short_run() -> RunOptions {
    RunOptions {
        steps: 120,
        report_every: 0,
        ..RunOptions::default()
    }
}

#[test]
fn pair_snaps_on_the_first_step() -> anyhow::Result<()> {
    let mut world = build(Scenario::Pair, WorldConfig::default(), &SceneOverrides::default())?;
    let summary = run(&mut world, &RunOptions { steps: 1, ..short_run() });
    assert_eq!(summary.fractures, 1);
    // 0.5 * 1000 * 0.6^2
    assert!((summary.released_energy - 180.0).abs() < 1.0);
    Ok(())
}

#[test]
fn chain_runs_clean() -> anyhow::Result<()> {
    let mut world = build(Scenario::Chain, WorldConfig::default(), &SceneOverrides::default())?;
    let summary = run(&mut world, &short_run());
    assert_eq!(summary.steps, 120);
    assert_eq!(summary.fractures, 0);
    assert_eq!(summary.frozen_bodies, 0);
    assert!(summary.final_energy.is_finite());
    Ok(())
}

#[test]
fn every_scenario_stays_finite() -> anyhow::Result<()> {
    for scenario in [Scenario::Chain, Scenario::Plate, Scenario::Pair, Scenario::Impact] {
        let mut world = build(
            scenario,
            WorldConfig {
                substeps: 4,
                ..WorldConfig::default()
            },
            &SceneOverrides::default(),
        )?;
        let summary = run(&mut world, &short_run());
        assert!(summary.final_energy.is_finite(), "{scenario:?}");
        assert!(world.bodies().all(|(_, body)| body.position.is_finite()), "{scenario:?}");
    }
    Ok(())
}
