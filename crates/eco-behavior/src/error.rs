use thiserror::Error;

use eco_core::AgentId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("agent {agent} failed: {reason}")]
    Failed { agent: AgentId, reason: String },

    #[error("behavior configuration error: {0}")]
    Config(String),
}

impl BehaviorError {
    pub fn failed(agent: AgentId, reason: impl Into<String>) -> Self {
        BehaviorError::Failed { agent, reason: reason.into() }
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
