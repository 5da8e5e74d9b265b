#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::similar_names,
    clippy::trivially_copy_pass_by_ref
)]
//! # Shatter Physics Engine
//!
//! A small constraint-based rigid-body engine whose links store elastic
//! energy and fracture, turning that energy into separating impulses.
//!
//! ## Key Components
//!
//! -   **Bodies:** [`Body`] carries pose, velocity and [`MassProperties`].
//!     Shapes are points, spheres and oriented boxes ([`Shape`]).
//! -   **Constraints:** [`Constraint`] links two bodies with a spring-damper
//!     or compliant solve strategy, breaks on a chosen [`BreakCriterion`] and
//!     releases its stored energy through a [`FractureRelease`] model.
//! -   **World:** [`World`] owns bodies and constraints and runs the fixed
//!     step pipeline: forces, constraint solve, fracture, integration,
//!     ground and body contact, energy bookkeeping.
//! -   **Topology:** [`topology`] builds hanging chains and pre-fractured
//!     fragment grids.
//!
//! ## Usage
//!
//! ```rust
//! use shatter_physics::{ConstraintAnchors, ConstraintParams, BreakCriterion, RestLength, World, WorldConfig};
//! use glam::Vec3;
//!
//! let mut world = World::new(WorldConfig::default())?;
//! let top = world.add_anchor(Vec3::new(0.0, 5.0, 0.0));
//! let weight = world.add_sphere(Vec3::new(0.0, 4.0, 0.0), 0.2, 1.0);
//! let params = ConstraintParams::spring(500.0, 1.0).breaking_at(BreakCriterion::Stretch { max: 0.5 });
//! world.create_constraint(top, weight, ConstraintAnchors::Centers, params, RestLength::Current)?;
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0);
//! }
//! # Ok::<(), shatter_physics::PhysicsError>(())
//! ```

pub mod body;
pub mod builder;
pub mod collision;
pub mod constraint;
pub mod error;
pub mod ground;
pub mod integrator;
pub mod shapes;
pub(crate) mod steps;
pub(crate) mod storage;
pub mod topology;
pub mod transform;
pub mod types;
pub mod world;

pub use body::{Body, MassProperties, MASS_EPSILON};
pub use builder::{BodyDesc, ConstraintAnchors, RestLength};
pub use collision::{CollisionConfig, CollisionDispatcher, Contact};
pub use constraint::{
    BreakCriterion, BreakGate, Constraint, ConstraintParams, FractureDirection, FractureImpulse, FractureRelease,
    SolveStrategy,
};
pub use error::PhysicsError;
pub use ground::GroundPlane;
pub use integrator::Integrator;
pub use shapes::{Shape, ShapeKind};
pub use topology::{build_chain, build_fragment_grid, connect_nearby, Chain, ChainDesc, FragmentGrid, FragmentGridDesc};
pub use types::{
    BodyHandle, BodySnapshot, Bounds, ConstraintHandle, EnergyReport, FractureEvent, LinkSnapshot, Material, StepStats,
};
pub use world::{FractureConfig, World, WorldConfig};
