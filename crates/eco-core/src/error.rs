//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `EcoError` via `#[from]`,
//! so `?` works across crate boundaries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcoError {
    /// A `SimConfig` field is out of range.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `eco-core`.
pub type EcoResult<T> = Result<T, EcoError>;
