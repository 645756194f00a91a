//! Seeded random number generators.
//!
//! Every agent carries its own [`AgentRng`], seeded from the run seed and the
//! agent's id:
//!
//!   seed = global_seed XOR (agent_id * 0x9e37_79b9_7f4a_7c15)
//!
//! The multiplier spreads consecutive ids across the seed space.  The stream
//! an agent draws from therefore depends only on `(global_seed, id)`, never
//! on which chunk or worker thread runs it.  Pooled storage is reseeded when
//! it is activated under a new id.
//!
//! [`SimRng`] is the single-threaded generator for world setup.
//!
//! Both implement [`rand::RngCore`], so any `rand` distribution can sample
//! from them directly.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

use crate::AgentId;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn agent_seed(global_seed: u64, agent: AgentId) -> u64 {
    global_seed ^ u64::from(agent.0).wrapping_mul(GOLDEN_GAMMA)
}

/// Convenience draws shared by both generators.
macro_rules! draws {
    ($name:ident) => {
        impl $name {
            /// A value of any type with a standard distribution.
            #[inline]
            pub fn random<T>(&mut self) -> T
            where
                rand::distributions::Standard: rand::distributions::Distribution<T>,
            {
                self.0.r#gen()
            }

            #[inline]
            pub fn gen_range<T, R>(&mut self, range: R) -> T
            where
                T: rand::distributions::uniform::SampleUniform,
                R: rand::distributions::uniform::SampleRange<T>,
            {
                self.0.gen_range(range)
            }

            /// `true` with probability `p`; `p` is clamped to `[0, 1]`.
            #[inline]
            pub fn gen_bool(&mut self, p: f64) -> bool {
                let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
                self.0.gen_bool(p)
            }

            /// A uniformly chosen element, or `None` for an empty slice.
            #[inline]
            pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
                items.choose(&mut self.0)
            }
        }

        impl RngCore for $name {
            fn next_u32(&mut self) -> u32 {
                self.0.next_u32()
            }

            fn next_u64(&mut self) -> u64 {
                self.0.next_u64()
            }

            fn fill_bytes(&mut self, dest: &mut [u8]) {
                self.0.fill_bytes(dest)
            }

            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                self.0.try_fill_bytes(dest)
            }
        }
    };
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        Self(SmallRng::seed_from_u64(agent_seed(global_seed, agent)))
    }

    /// Restart the stream for `agent`, as if freshly created.
    pub fn reseed(&mut self, global_seed: u64, agent: AgentId) {
        *self = Self::new(global_seed, agent);
    }
}

/// Seeded for [`AgentId::INVALID`]; prototypes carry this until activation.
impl Default for AgentRng {
    fn default() -> Self {
        Self::new(0, AgentId::INVALID)
    }
}

draws!(AgentRng);

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for initial placement and other setup done between steps.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

draws!(SimRng);
