//! `eco-agent`: agent records and the recycling pool.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`agent`]   | `Agent<S, M>`, `AgentState` trait                          |
//! | [`message`] | `Message<M>` envelope (sender, recipients, opaque content) |
//! | [`pool`]    | `AgentPool<S, M>`, `PoolStats`                             |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                             |
//!
//! Agents do not hold a pointer back to the simulation.  They are identified
//! by their [`AgentId`](eco_core::AgentId) and reach the world only through
//! the context handed to them each step, so recycling an agent is a flat
//! field reset rather than a deep clone of an object graph.

pub mod agent;
pub mod error;
pub mod message;
pub mod pool;


pub use agent::{Agent, AgentState};
pub use error::{AgentError, AgentResult};
pub use message::Message;
pub use pool::{AgentPool, PoolStats};
