use thiserror::Error;

use eco_agent::AgentError;
use eco_behavior::BehaviorError;
use eco_core::{EcoError, Point2, PopulationKey};
use eco_space::SpaceError;

use crate::Phase;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("operation requires phase {expected:?} but the simulation is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("no prototype registered for population {0:?}")]
    UnknownPopulation(PopulationKey),

    #[error("addition of {population:?} at {point} lies outside the space")]
    OutOfBounds { population: PopulationKey, point: Point2 },

    #[error("agent id space exhausted")]
    IdsExhausted,

    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("worker pool error: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Space(#[from] SpaceError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Eco(#[from] EcoError),
}

pub type SimResult<T> = Result<T, SimError>;
