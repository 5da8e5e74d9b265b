use glam::Vec3;
use shatter_physics::{Integrator, PhysicsError, World, WorldConfig};

#[test]
fn partial_json_fills_in_defaults() -> anyhow::Result<()> {
    let json = r#"{
        "gravity": [0.0, -1.62, 0.0],
        "substeps": 4,
        "ground": null,
        "integrator": "Rk4",
        "fracture": { "max_delta_v": 12.0 }
    }"#;
    let config: WorldConfig = serde_json::from_str(json)?;

    assert_eq!(config.gravity, Vec3::new(0.0, -1.62, 0.0));
    assert_eq!(config.substeps, 4);
    assert_eq!(config.solver_iterations, WorldConfig::default().solver_iterations);
    assert!(config.ground.is_none());
    assert_eq!(config.integrator, Integrator::Rk4);
    assert_eq!(config.fracture.max_delta_v, Some(12.0));
    assert!(config.fracture.accumulate);

    let mut world = World::new(config)?;
    assert_eq!(world.config().substeps, 4);

    let ball = world.add_point_mass(Vec3::new(0.0, 10.0, 0.0), 1.0);
    world.step(1.0);
    let fallen = world.body(ball).unwrap();
    assert!((fallen.linear_velocity.y + 1.62).abs() < 1e-5);
    Ok(())
}

#[test]
fn round_trips_through_json() -> anyhow::Result<()> {
    let config = WorldConfig {
        linear_damping: 0.2,
        ..WorldConfig::default()
    };
    let text = serde_json::to_string(&config)?;
    let back: WorldConfig = serde_json::from_str(&text)?;
    assert_eq!(back, config);
    Ok(())
}

#[test]
fn bad_values_are_rejected_by_the_world() -> anyhow::Result<()> {
    for json in [
        r#"{ "solver_iterations": 0 }"#,
        r#"{ "linear_damping": -1.0 }"#,
        r#"{ "collision": { "position_correction": 2.0 } }"#,
        r#"{ "fracture": { "max_delta_v": 0.0 } }"#,
    ] {
        let config: WorldConfig = serde_json::from_str(json)?;
        let result = World::new(config);
        assert!(matches!(result, Err(PhysicsError::InvalidConfig(_))), "{json} should be rejected");
    }
    Ok(())
}
