//! `eco-core`: foundational types for the `rust_eco` simulation engine.
//!
//! This crate is a dependency of every other `eco-*` crate.  It intentionally
//! has no `eco-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `PopulationKey`                            |
//! | [`geo`]         | `Point2`, `Projection`, `Motion`, `Heading`           |
//! | [`time`]        | `Step`, `SimConfig`                                   |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `EcoError`, `EcoResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EcoError, EcoResult};
pub use geo::{Heading, Motion, Point2, Projection, normalize_angle};
pub use ids::{AgentId, PopulationKey};
pub use rng::{AgentRng, SimRng};
pub use time::{SimConfig, Step};
