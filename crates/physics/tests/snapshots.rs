use glam::Vec3;
use shatter_physics::{
    BodyDesc, BreakCriterion, ConstraintAnchors, ConstraintParams, RestLength, Shape, World, WorldConfig,
};

fn free_space() -> WorldConfig {
    WorldConfig {
        gravity: Vec3::ZERO,
        ground: None,
        ..WorldConfig::default()
    }
}

#[test]
fn link_snapshots_follow_anchors_and_breaks() -> anyhow::Result<()> {
    let mut world = World::new(free_space())?;
    let hook = world.add_anchor(Vec3::new(0.0, 5.0, 0.0));
    let block = world.add_box(Vec3::new(2.0, 5.0, 0.0), Vec3::splat(0.5), 1.0);
    let link = world.create_constraint(
        hook,
        block,
        ConstraintAnchors::Local {
            a: Vec3::ZERO,
            b: Vec3::new(-0.5, 0.0, 0.0),
        },
        ConstraintParams::spring(100.0, 0.0).breaking_at(BreakCriterion::Stretch { max: 1.0 }),
        RestLength::Fixed(1.0),
    )?;

    let (start, end) = world.constraint_endpoints(link).unwrap();
    assert!(start.abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), 1e-6));
    assert!(end.abs_diff_eq(Vec3::new(1.5, 5.0, 0.0), 1e-6));

    let links = world.link_snapshots();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].start, start.to_array());
    assert_eq!(links[0].end, end.to_array());
    assert!((links[0].stress - 0.5).abs() < 1e-5);
    assert_eq!(links[0].broken, 0);

    world.body_mut(block).unwrap().position = Vec3::new(4.0, 5.0, 0.0);
    let stats = world.step(1.0 / 60.0);
    assert_eq!(stats.broken_this_step, 1);

    let links = world.link_snapshots();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].broken, 1);
    let (_, end) = world.constraint_endpoints(link).unwrap();
    assert_eq!(links[0].end, end.to_array());

    assert_eq!(world.prune_broken_constraints(), 1);
    assert!(world.link_snapshots().is_empty());
    assert_eq!(world.constraint_endpoints(link), None);
    Ok(())
}

#[test]
fn offset_mass_spins_about_its_center_of_mass() -> anyhow::Result<()> {
    let mut world = World::new(free_space())?;
    let bar = world.create_body(
        BodyDesc::dynamic(Shape::cuboid(Vec3::new(1.0, 0.25, 0.25)), 2.0)
            .at(Vec3::new(0.0, 3.0, 0.0))
            .with_center_of_mass(Vec3::new(0.5, 0.0, 0.0)),
    );
    world.body_mut(bar).unwrap().angular_velocity = Vec3::new(0.0, 0.0, 2.0);
    let pivot = world.body(bar).unwrap().center_of_mass_world();
    assert!(pivot.abs_diff_eq(Vec3::new(0.5, 3.0, 0.0), 1e-6));

    for step in 0..120 {
        world.step(1.0 / 60.0);
        let com = world.body(bar).unwrap().center_of_mass_world();
        assert!(com.abs_diff_eq(pivot, 1e-3), "step {step}: center of mass drifted to {com}");
    }

    let body = world.body(bar).unwrap();
    assert!(body.position.distance(Vec3::new(0.0, 3.0, 0.0)) > 0.2);
    assert!(body.linear_velocity.length() < 1e-4);
    Ok(())
}
