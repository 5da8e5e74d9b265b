//! Fixed scene topologies: hanging chains and pre-fractured fragment grids.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::builder::{BodyDesc, ConstraintAnchors, RestLength};
use crate::constraint::ConstraintParams;
use crate::error::PhysicsError;
use crate::shapes::Shape;
use crate::transform::{normalize_or, FALLBACK_AXIS};
use crate::types::{BodyHandle, ConstraintHandle, Material};
use crate::World;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainDesc {
    /// Position of the first node.
    pub origin: Vec3,
    /// Direction the chain extends in from the origin.
    pub direction: Vec3,
    pub nodes: usize,
    pub node_mass: f32,
    /// Distance between nodes, also the rest length of every link.
    pub spacing: f32,
    pub node_shape: Shape,
    /// Make the first node a static anchor.
    pub pin_first: bool,
    pub link: ConstraintParams,
}

impl Default for ChainDesc {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 5.0, 0.0),
            direction: Vec3::NEG_Y,
            nodes: 20,
            node_mass: 0.08,
            spacing: 0.15,
            node_shape: Shape::Point,
            pin_first: true,
            link: ConstraintParams::spring(600.0, 0.1),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Chain {
    pub nodes: Vec<BodyHandle>,
    /// `links[i]` joins `nodes[i]` and `nodes[i + 1]`.
    pub links: Vec<ConstraintHandle>,
}

/// Spawn a chain of nodes joined by links of length `spacing`.
///
/// # Errors
///
/// Only fails if the world rejects a link, which a fresh chain never causes.
pub fn build_chain(world: &mut World, desc: &ChainDesc) -> Result<Chain, PhysicsError> {
    let direction = normalize_or(desc.direction, -FALLBACK_AXIS);
    let mut chain = Chain::default();

    for i in 0..desc.nodes {
        let position = desc.origin + direction * (desc.spacing * i as f32);
        let body = if i == 0 && desc.pin_first {
            BodyDesc::fixed(desc.node_shape)
        } else {
            BodyDesc::dynamic(desc.node_shape, desc.node_mass)
        };
        chain.nodes.push(world.create_body(body.at(position)));
    }

    for pair in chain.nodes.windows(2) {
        let link = world.create_constraint(
            pair[0],
            pair[1],
            ConstraintAnchors::Centers,
            desc.link,
            RestLength::Fixed(desc.spacing),
        )?;
        chain.links.push(link);
    }
    Ok(chain)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentGridDesc {
    /// Centre of the whole block.
    pub center: Vec3,
    /// Fragments along x, y and z.
    pub counts: UVec3,
    /// Size of one fragment along each axis.
    pub fragment_size: Vec3,
    pub fragment_mass: f32,
    pub material: Material,
    /// Fragments closer than this many fragment sizes are linked.
    pub link_radius: f32,
    pub link: ConstraintParams,
}

impl Default for FragmentGridDesc {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 3.0, 0.0),
            counts: UVec3::new(4, 1, 4),
            fragment_size: Vec3::new(0.5, 0.1, 0.5),
            fragment_mass: 0.5,
            material: Material::default(),
            link_radius: 1.5,
            link: ConstraintParams::spring(2000.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FragmentGrid {
    /// Row-major: x fastest, then z, then y.
    pub fragments: Vec<BodyHandle>,
    pub links: Vec<ConstraintHandle>,
}

/// Spawn a block of box fragments and link every pair of near neighbours.
///
/// # Errors
///
/// Only fails if the world rejects a link, which a fresh grid never causes.
pub fn build_fragment_grid(world: &mut World, desc: &FragmentGridDesc) -> Result<FragmentGrid, PhysicsError> {
    let counts = desc.counts.max(UVec3::ONE);
    let half = desc.fragment_size * 0.5;
    let corner = desc.center - desc.fragment_size * (counts.as_vec3() - Vec3::ONE) * 0.5;

    let mut fragments = Vec::with_capacity((counts.x * counts.y * counts.z) as usize);
    for y in 0..counts.y {
        for z in 0..counts.z {
            for x in 0..counts.x {
                let position = corner + desc.fragment_size * UVec3::new(x, y, z).as_vec3();
                let body = BodyDesc::dynamic(Shape::cuboid(half), desc.fragment_mass)
                    .at(position)
                    .with_material(desc.material);
                fragments.push(world.create_body(body));
            }
        }
    }

    let max_distance = desc.link_radius * desc.fragment_size.max_element();
    let links = connect_nearby(world, &fragments, max_distance, desc.link)?;
    Ok(FragmentGrid { fragments, links })
}

/// Link every pair in `bodies` whose centres are closer than `max_distance`.
///
/// Links attach at the body centres and start relaxed.
///
/// # Errors
///
/// Fails if a handle is stale or appears twice.
pub fn connect_nearby(
    world: &mut World,
    bodies: &[BodyHandle],
    max_distance: f32,
    params: ConstraintParams,
) -> Result<Vec<ConstraintHandle>, PhysicsError> {
    let positions = bodies
        .iter()
        .map(|&h| world.body(h).map(|b| b.position).ok_or(PhysicsError::UnknownBody(h)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut links = Vec::new();
    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            if positions[i].distance(positions[j]) < max_distance {
                links.push(world.create_constraint(
                    bodies[i],
                    bodies[j],
                    ConstraintAnchors::Centers,
                    params,
                    RestLength::Current,
                )?);
            }
        }
    }
    Ok(links)
}
