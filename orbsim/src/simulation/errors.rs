//! Error types for the physics core.

use thiserror::Error;

use crate::simulation::states::BodyId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("invalid orbit: {reason}")]
    InvalidOrbit { reason: String },

    #[error("invalid mass {mass}: mass must be finite and positive")]
    InvalidMass { mass: f64 },

    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    #[error("bodies {a} and {b} are {distance} apart, below the minimum separation")]
    DegenerateSeparation { a: BodyId, b: BodyId, distance: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
