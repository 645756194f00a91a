//! Per-population agent recycling.
//!
//! Each population owns one bucket: a prototype agent and a free list of
//! released agents.  [`AgentPool::borrow`] pops from the free list and resets
//! the instance from the prototype, or clones the prototype when the list is
//! empty.  [`AgentPool::release`] only stores the instance; scrubbing happens
//! on the next borrow.
//!
//! The pool belongs to one simulation and is driven by its stepping thread
//! only; it needs no internal locking.

use rustc_hash::FxHashMap;
use tracing::debug;

use eco_core::PopulationKey;

use crate::{Agent, AgentError, AgentResult, AgentState};

/// Borrow/release counters for one population.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Agents produced by cloning the prototype.
    pub created: u64,
    /// Agents handed out again after a release.
    pub recycled: u64,
    /// Agents returned to the pool.
    pub released: u64,
}

struct Bucket<S, M> {
    prototype: Agent<S, M>,
    free: Vec<Agent<S, M>>,
    stats: PoolStats,
}

pub struct AgentPool<S, M> {
    buckets: FxHashMap<PopulationKey, Bucket<S, M>>,
}

impl<S: AgentState, M> AgentPool<S, M> {
    pub fn new() -> Self {
        Self { buckets: FxHashMap::default() }
    }

    /// Register (or replace) the prototype state for `population`.
    ///
    /// Replacing a prototype keeps the free list; those agents are reset
    /// from the new prototype when borrowed.
    pub fn register(&mut self, population: PopulationKey, state: S) {
        let prototype = Agent::prototype(population.clone(), state);
        match self.buckets.get_mut(&population) {
            Some(bucket) => bucket.prototype = prototype,
            None => {
                debug!(%population, "registered agent prototype");
                self.buckets.insert(
                    population,
                    Bucket { prototype, free: Vec::new(), stats: PoolStats::default() },
                );
            }
        }
    }

    /// Pre-fill the free list of `population` up to `capacity` agents.
    pub fn with_capacity(&mut self, population: &PopulationKey, capacity: usize) -> AgentResult<()> {
        let bucket = self.bucket_mut(population)?;
        let missing = capacity.saturating_sub(bucket.free.len());
        bucket.free.reserve(missing);
        for _ in 0..missing {
            bucket.free.push(bucket.prototype.clone());
        }
        Ok(())
    }

    /// An inactive agent of `population` whose fields equal the prototype's.
    ///
    /// # Errors
    ///
    /// `UnknownPopulation` if no prototype was registered for `population`.
    pub fn borrow(&mut self, population: &PopulationKey) -> AgentResult<Agent<S, M>> {
        let bucket = self.bucket_mut(population)?;
        match bucket.free.pop() {
            Some(mut agent) => {
                agent.reset_from(&bucket.prototype);
                bucket.stats.recycled += 1;
                Ok(agent)
            }
            None => {
                bucket.stats.created += 1;
                Ok(bucket.prototype.clone())
            }
        }
    }

    /// Return an inactive agent to its population's free list.
    ///
    /// # Errors
    ///
    /// `StillActive` if the agent has not been deactivated, or
    /// `UnknownPopulation` if its population has no bucket.
    pub fn release(&mut self, agent: Agent<S, M>) -> AgentResult<()> {
        if agent.is_active() {
            return Err(AgentError::StillActive(agent.id()));
        }
        let bucket = self.bucket_mut(agent.population())?;
        bucket.stats.released += 1;
        bucket.free.push(agent);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, population: &PopulationKey) -> bool {
        self.buckets.contains_key(population)
    }

    /// Agents waiting on the free list of `population`.
    pub fn available(&self, population: &PopulationKey) -> usize {
        self.buckets.get(population).map_or(0, |b| b.free.len())
    }

    pub fn stats(&self, population: &PopulationKey) -> Option<PoolStats> {
        self.buckets.get(population).map(|b| b.stats)
    }

    pub fn prototype(&self, population: &PopulationKey) -> Option<&Agent<S, M>> {
        self.buckets.get(population).map(|b| &b.prototype)
    }

    pub fn populations(&self) -> impl Iterator<Item = &PopulationKey> {
        self.buckets.keys()
    }

    fn bucket_mut(&mut self, population: &PopulationKey) -> AgentResult<&mut Bucket<S, M>> {
        self.buckets
            .get_mut(population)
            .ok_or_else(|| AgentError::UnknownPopulation(population.clone()))
    }
}

impl<S: AgentState, M> Default for AgentPool<S, M> {
    fn default() -> Self {
        Self::new()
    }
}
