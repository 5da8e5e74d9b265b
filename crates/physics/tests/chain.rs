use glam::Vec3;
use shatter_physics::{build_chain, BreakCriterion, ChainDesc, ConstraintParams, World, WorldConfig};

#[test]
fn first_step_of_a_hanging_chain() -> anyhow::Result<()> {
    let mut world = World::new(WorldConfig {
        solver_iterations: 6,
        ..WorldConfig::default()
    })?;
    let desc = ChainDesc::default();
    let chain = build_chain(&mut world, &desc)?;

    world.step(1.0 / 600.0);

    let top = world.body(chain.nodes[0]).map(|b| b.position).unwrap_or(Vec3::NAN);
    let second = world.body(chain.nodes[1]).unwrap();
    assert_eq!(top, desc.origin);
    assert!((second.linear_velocity.y + 0.01635).abs() < 1e-3, "v = {}", second.linear_velocity);
    assert!(top.distance(second.position) <= desc.spacing * 1.01);
    Ok(())
}

#[test]
fn chain_hangs_without_tearing() -> anyhow::Result<()> {
    let mut world = World::new(WorldConfig {
        substeps: 8,
        linear_damping: 0.5,
        ..WorldConfig::default()
    })?;
    let desc = ChainDesc::default();
    let chain = build_chain(&mut world, &desc)?;

    for _ in 0..300 {
        world.step(1.0 / 60.0);
    }
    assert_eq!(world.active_constraint_count(), chain.links.len());

    let positions: Vec<Vec3> = chain
        .nodes
        .iter()
        .filter_map(|&h| world.body(h).map(|b| b.position))
        .collect();
    assert_eq!(positions.len(), desc.nodes);
    for pair in positions.windows(2) {
        assert!(pair[0].is_finite() && pair[1].is_finite());
        assert!(pair[1].y < pair[0].y, "chain should hang below its pin");
    }
    assert!(world.stats().frozen_bodies == 0);
    Ok(())
}

#[test]
fn overloaded_chain_snaps() -> anyhow::Result<()> {
    let mut world = World::new(WorldConfig {
        substeps: 4,
        ..WorldConfig::default()
    })?;
    let desc = ChainDesc {
        nodes: 6,
        node_mass: 2.0,
        link: ConstraintParams::spring(100.0, 0.5).breaking_at(BreakCriterion::Stretch { max: 0.1 }),
        ..ChainDesc::default()
    };
    build_chain(&mut world, &desc)?;

    let mut broken = 0;
    for _ in 0..120 {
        broken += world.step(1.0 / 60.0).broken_this_step;
    }
    assert!(broken > 0);
    assert_eq!(world.drain_fracture_events().len(), broken);
    Ok(())
}
