//! Simulation time model and top-level configuration.
//!
//! Time is a monotonically increasing [`Step`] counter.  Each call to the
//! engine's `next_step` advances it by exactly one; there is no wall-clock
//! mapping at this layer.

use std::fmt;

use crate::{EcoError, EcoResult};

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// The step after `self`.
    #[inline]
    pub fn next(self) -> Step {
        Step(self.0 + 1)
    }

    /// Steps elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Default maximum number of agents per parallel execution chunk.
pub const DEFAULT_PARALLELIZATION_THRESHOLD: usize = 1_000;

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Grid width in tiles (world x-extent is `0.0 .. width`).
    pub width: u32,

    /// Grid height in tiles (world y-extent is `0.0 .. height`).
    pub height: u32,

    /// Maximum agents per parallel chunk in the execution and movement
    /// sub-phases.  Must be positive.
    pub parallelization_threshold: usize,

    /// Worker thread count for the Rayon pool.  `None` uses all logical cores.
    /// Ignored when a pool is injected through the builder.
    pub num_threads: Option<usize>,

    /// Master RNG seed.  Per-agent RNGs are derived from it and the agent id.
    pub seed: u64,

    /// Number of steps `Sim::run` executes.
    pub total_steps: u64,
}

impl SimConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> EcoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EcoError::Config(format!(
                "grid must be at least 1×1, got {}×{}",
                self.width, self.height
            )));
        }
        if self.parallelization_threshold == 0 {
            return Err(EcoError::Config("parallelization_threshold must be positive".into()));
        }
        if self.num_threads == Some(0) {
            return Err(EcoError::Config("num_threads must be positive when set".into()));
        }
        Ok(())
    }

    /// The step at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            parallelization_threshold: DEFAULT_PARALLELIZATION_THRESHOLD,
            num_threads: None,
            seed: 0,
            total_steps: 0,
        }
    }
}
