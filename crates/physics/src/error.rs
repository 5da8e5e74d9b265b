use thiserror::Error;

use crate::types::{BodyHandle, ConstraintHandle};

/// Errors surfaced to the host while configuring a world or wiring its topology.
///
/// Degenerate numerical input during stepping is clamped or skipped and never
/// reaches this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
    #[error("unknown constraint {0:?}")]
    UnknownConstraint(ConstraintHandle),
    #[error("a constraint needs two distinct bodies, got {0:?} twice")]
    SelfConstraint(BodyHandle),
}
