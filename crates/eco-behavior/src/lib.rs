//! `eco-behavior`: the agent behaviour trait and what it may touch.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`model`]    | `Behavior` trait                                               |
//! | [`context`]  | `StepContext<'a>`: read-only world view shared by all agents  |
//! | [`commands`] | `Commands`, `Addition`, `AgentEvent`: deferred mutations      |
//! | [`snapshot`] | `StepSnapshot`: concurrent per-step key/value scratch map     |
//! | [`noop`]     | `NoopBehavior`: agents that never act                         |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                           |
//!
//! # Execution model
//!
//! During the execution phase every active agent runs
//! [`Behavior::act`] with exclusive access to its own record and shared,
//! read-only access to the world through [`StepContext`].  Anything that
//! changes the world (births, deaths, messages) is written to the task's
//! [`Commands`] buffer and applied by the engine after all tasks finish.
//! The only shared state agents may write during the phase is the
//! [`StepSnapshot`].

pub mod commands;
pub mod context;
pub mod error;
pub mod model;
pub mod noop;
pub mod snapshot;


pub use commands::{Addition, AgentEvent, Commands, Initializer};
pub use context::StepContext;
pub use error::{BehaviorError, BehaviorResult};
pub use model::{AgentOf, Behavior};
pub use noop::NoopBehavior;
pub use snapshot::StepSnapshot;
