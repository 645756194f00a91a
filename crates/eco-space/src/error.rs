//! Spatial-subsystem error type.

use thiserror::Error;

use eco_core::{AgentId, Point2};

/// Errors produced by `eco-space`.
#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("object {0} is already present in the space")]
    DuplicateObject(AgentId),

    #[error("object {0} is not present in the space")]
    UnknownObject(AgentId),

    #[error("position {point} of object {id} lies outside the space")]
    OutOfBounds { id: AgentId, point: Point2 },

    #[error("tile ({x}, {y}) lies outside the grid")]
    TileOutOfBounds { x: u32, y: u32 },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("wall list parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpaceResult<T> = Result<T, SpaceError>;
