use glam::{Quat, Vec3};
use shatter_physics::{
    BodyDesc, ConstraintAnchors, ConstraintParams, RestLength, Shape, World, WorldConfig,
};

#[test]
fn untouched_bodies_keep_their_pose() -> anyhow::Result<()> {
    let mut world = World::new(WorldConfig {
        gravity: Vec3::ZERO,
        ground: None,
        ..WorldConfig::default()
    })?;
    let tilted = Quat::from_rotation_x(0.3) * Quat::from_rotation_y(1.1);
    let a = world.create_body(
        BodyDesc::dynamic(Shape::cuboid(Vec3::new(0.5, 0.2, 0.3)), 2.0)
            .at(Vec3::new(0.0, 2.0, 0.0))
            .with_orientation(tilted),
    );
    let b = world.add_sphere(Vec3::new(3.0, 2.0, 1.0), 0.4, 1.0);
    let anchor = world.add_anchor(Vec3::new(0.0, 6.0, 0.0));
    world.create_constraint(anchor, a, ConstraintAnchors::Centers, ConstraintParams::compliant(1e-4, 0.5), RestLength::Current)?;
    world.create_constraint(a, b, ConstraintAnchors::Centers, ConstraintParams::spring(800.0, 2.0), RestLength::Current)?;

    let before: Vec<_> = world.bodies().map(|(_, body)| (body.position, body.orientation)).collect();
    for _ in 0..200 {
        world.step(1.0 / 60.0);
    }
    let after: Vec<_> = world.bodies().map(|(_, body)| (body.position, body.orientation)).collect();

    assert_eq!(before, after);
    assert_eq!(world.stats().active_constraints, 2);
    Ok(())
}

#[test]
fn resting_sphere_stays_on_the_ground() -> anyhow::Result<()> {
    let mut world = World::new(WorldConfig::default())?;
    let ball = world.add_sphere(Vec3::new(0.0, 0.5, 0.0), 0.5, 1.0);

    for step in 0..120 {
        let stats = world.step(1.0 / 60.0);
        let body = world.body(ball).unwrap();
        assert!((body.position.y - 0.5).abs() < 1e-5, "step {step}: y = {}", body.position.y);
        assert!(body.linear_velocity.y.abs() < 1e-5);
        assert_eq!(stats.ground_contacts, 1);
    }
    Ok(())
}

#[test]
fn dropped_box_settles_above_ground() -> anyhow::Result<()> {
    let mut world = World::new(WorldConfig::default())?;
    let crate_box = world.add_box(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.25), 1.0);

    for _ in 0..300 {
        world.step(1.0 / 60.0);
    }
    let body = world.body(crate_box).unwrap();
    assert!(body.position.y > 0.2 && body.position.y < 0.3, "y = {}", body.position.y);
    assert!(body.linear_velocity.length() < 0.2);
    Ok(())
}
