//! Secondary index: population key → member object ids.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use eco_core::{AgentId, PopulationKey};

/// Population buckets kept in lock-step with the [`Space`](crate::Space).
///
/// Members are held in a `BTreeSet` so iteration order is ascending by id and
/// does not depend on hashing.
#[derive(Default, Debug)]
pub struct PopulationIndex {
    buckets: FxHashMap<PopulationKey, BTreeSet<AgentId>>,
    total: usize,
}

impl PopulationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `id` was already a member of `population`.
    pub fn insert(&mut self, population: &PopulationKey, id: AgentId) -> bool {
        let added = self.buckets.entry(population.clone()).or_default().insert(id);
        if added {
            self.total += 1;
        }
        added
    }

    /// Returns `false` if `id` was not a member of `population`.
    pub fn remove(&mut self, population: &PopulationKey, id: AgentId) -> bool {
        let Some(bucket) = self.buckets.get_mut(population) else {
            return false;
        };
        let removed = bucket.remove(&id);
        if removed {
            self.total -= 1;
        }
        removed
    }

    #[inline]
    pub fn count(&self, population: &PopulationKey) -> usize {
        self.buckets.get(population).map_or(0, BTreeSet::len)
    }

    /// Members across every population.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn contains(&self, population: &PopulationKey, id: AgentId) -> bool {
        self.buckets.get(population).is_some_and(|b| b.contains(&id))
    }

    /// Members of `population` in ascending id order.
    pub fn members(&self, population: &PopulationKey) -> impl Iterator<Item = AgentId> + use<'_> {
        self.buckets.get(population).into_iter().flat_map(|b| b.iter().copied())
    }

    /// Populations that currently have at least one member.
    pub fn populations(&self) -> impl Iterator<Item = &PopulationKey> + '_ {
        self.buckets.iter().filter(|(_, b)| !b.is_empty()).map(|(k, _)| k)
    }
}
