//! Demo scenes.

use anyhow::Result;
use clap::ValueEnum;
use glam::{UVec3, Vec3};
use serde::Deserialize;
use shatter_physics::{
    build_chain, build_fragment_grid, BodyDesc, BreakCriterion, ChainDesc, ConstraintAnchors, ConstraintParams,
    FragmentGridDesc, Material, RestLength, Shape, World, WorldConfig,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Pinned chain of point masses swinging under gravity.
    Chain,
    /// Linked plate of box fragments dropped onto the ground.
    Plate,
    /// Two masses on an overstretched link that snaps at once.
    Pair,
    /// Heavy ball fired into a standing fragment wall.
    Impact,
}

/// Replacement topology descriptors read from a scene file.
///
/// A section left out keeps the scenario's built-in layout; inside a section,
/// missing fields take the descriptor's defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneOverrides {
    pub chain: Option<ChainDesc>,
    pub plate: Option<FragmentGridDesc>,
    pub wall: Option<FragmentGridDesc>,
}

fn plate_desc() -> FragmentGridDesc {
    FragmentGridDesc {
        center: Vec3::new(0.0, 3.0, 0.0),
        counts: UVec3::new(5, 1, 5),
        link: ConstraintParams::spring(2000.0, 1.0).breaking_at(BreakCriterion::Stretch { max: 0.02 }),
        ..FragmentGridDesc::default()
    }
}

fn wall_desc() -> FragmentGridDesc {
    FragmentGridDesc {
        center: Vec3::new(0.0, 1.0, 0.0),
        counts: UVec3::new(4, 4, 1),
        fragment_size: Vec3::new(0.5, 0.5, 0.2),
        fragment_mass: 1.0,
        link: ConstraintParams::compliant(1e-4, 0.0).breaking_at(BreakCriterion::Force { max: 400.0 }),
        ..FragmentGridDesc::default()
    }
}

/// Create a world from `config` and populate it with `scenario`.
///
/// # Errors
///
/// Fails if `config` is invalid.
pub fn build(scenario: Scenario, config: WorldConfig, scene: &SceneOverrides) -> Result<World> {
    let mut world = World::new(config)?;
    match scenario {
        Scenario::Chain => {
            build_chain(&mut world, &scene.chain.unwrap_or_default())?;
        }
        Scenario::Plate => {
            build_fragment_grid(&mut world, &scene.plate.unwrap_or_else(plate_desc))?;
        }
        Scenario::Pair => {
            let a = world.add_point_mass(Vec3::new(-0.8, 2.0, 0.0), 1.0);
            let b = world.add_point_mass(Vec3::new(0.8, 2.0, 0.0), 1.0);
            let link = ConstraintParams::spring(1000.0, 0.0).breaking_at(BreakCriterion::Stretch { max: 0.5 });
            world.create_constraint(a, b, ConstraintAnchors::Centers, link, RestLength::Fixed(1.0))?;
        }
        Scenario::Impact => {
            build_fragment_grid(&mut world, &scene.wall.unwrap_or_else(wall_desc))?;
            world.create_body(
                BodyDesc::dynamic(Shape::sphere(0.3), 5.0)
                    .at(Vec3::new(0.0, 1.0, -4.0))
                    .with_velocity(Vec3::new(0.0, 0.0, 15.0))
                    .with_material(Material::new(0.4, 0.2)),
            );
        }
    }
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_builds() {
        for scenario in Scenario::value_variants() {
            let world = build(*scenario, WorldConfig::default(), &SceneOverrides::default()).unwrap();
            assert!(world.body_count() > 0, "{scenario:?} is empty");
        }
    }

    #[test]
    fn impact_wall_is_linked() {
        let world = build(Scenario::Impact, WorldConfig::default(), &SceneOverrides::default()).unwrap();
        // 16 fragments plus the ball
        assert_eq!(world.body_count(), 17);
        assert!(world.active_constraint_count() > 0);
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = WorldConfig {
            substeps: 0,
            ..WorldConfig::default()
        };
        assert!(build(Scenario::Pair, config, &SceneOverrides::default()).is_err());
    }

    #[test]
    fn scene_file_replaces_the_chain() {
        let scene: SceneOverrides = serde_json::from_str(
            r#"{"chain":{"nodes":5,"link":{"strategy":{"SpringDamper":{"stiffness":300.0,"damping":0.5}}}}}"#,
        )
        .unwrap();
        let chain = scene.chain.unwrap();
        assert_eq!(chain.spacing, ChainDesc::default().spacing);
        assert_eq!(chain.link, ConstraintParams::spring(300.0, 0.5));

        let world = build(Scenario::Chain, WorldConfig::default(), &scene).unwrap();
        assert_eq!(world.body_count(), 5);
        assert_eq!(world.active_constraint_count(), 4);
    }

    #[test]
    fn unknown_scene_section_is_rejected() {
        assert!(serde_json::from_str::<SceneOverrides>(r#"{"rope":{}}"#).is_err());
    }
}
