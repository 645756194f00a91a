use thiserror::Error;

use eco_core::{AgentId, PopulationKey};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no prototype registered for population {0:?}")]
    UnknownPopulation(PopulationKey),

    #[error("agent {0} is still active and cannot be returned to the pool")]
    StillActive(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
