//! The positioned-object store.
//!
//! # Data layout
//!
//! Entries live in a dense `Vec<Entry>`; `slots` maps each id to its index.
//! Removal swap-removes (single) or compacts in one pass (`remove_if`), so
//! the vector never has holes and the movement sub-phase can hand out
//! disjoint `&mut` chunks to Rayon workers.
//!
//! # Invariants
//!
//! - every stored id has exactly one entry and one population-index record;
//! - every mutation marks the [`SpatialIndex`] outdated; the index rebuilds
//!   before it answers the next query.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::trace;

use eco_core::{AgentId, Motion, Point2, PopulationKey, Projection};

use crate::index::IndexedPoint;
use crate::{CollisionRouter, PopulationIndex, SpaceError, SpaceResult, SpatialIndex, TileGrid, TileRouter};

// ── Entry ─────────────────────────────────────────────────────────────────────

/// One object's record in the store.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: AgentId,
    pub population: PopulationKey,
    pub projection: Projection,
}

impl Entry {
    #[inline]
    pub fn position(&self) -> Point2 {
        self.projection.position
    }

    /// Apply `motion`, clipped by `router`.  Returns `true` if the position
    /// or orientation changed.
    fn apply(&mut self, motion: Motion, router: &dyn CollisionRouter) -> bool {
        if motion.is_still() {
            return false;
        }
        let (orientation, preferred) = motion.apply(&self.projection);
        let transition = router.max_transition(self.projection.position, preferred);
        self.projection = Projection {
            position: transition.point,
            orientation,
            collided: transition.collided(),
        };
        true
    }
}

// ── Space ─────────────────────────────────────────────────────────────────────

/// Object → position store composed with a collision router, a spatial
/// index, and a population index.
pub struct Space {
    router: Box<dyn CollisionRouter>,
    entries: Vec<Entry>,
    slots: FxHashMap<AgentId, usize>,
    populations: PopulationIndex,
    index: SpatialIndex,
}

impl Space {
    pub fn new<R: CollisionRouter + 'static>(router: R) -> Self {
        Self {
            router: Box::new(router),
            entries: Vec::new(),
            slots: FxHashMap::default(),
            populations: PopulationIndex::new(),
            index: SpatialIndex::new(),
        }
    }

    /// Space over `grid` with the default [`TileRouter`].
    pub fn with_grid(grid: TileGrid) -> Self {
        Self::new(TileRouter::new(grid))
    }

    // ── Structural mutation ───────────────────────────────────────────────

    /// Insert a new object.
    ///
    /// # Errors
    ///
    /// `DuplicateObject` if `id` is already stored; `OutOfBounds` if the
    /// position is not inside the space.
    pub fn insert(&mut self, id: AgentId, population: PopulationKey, projection: Projection) -> SpaceResult<()> {
        if self.slots.contains_key(&id) {
            return Err(SpaceError::DuplicateObject(id));
        }
        if !self.router.contains(projection.position) {
            return Err(SpaceError::OutOfBounds { id, point: projection.position });
        }
        self.populations.insert(&population, id);
        self.slots.insert(id, self.entries.len());
        self.entries.push(Entry { id, population, projection });
        self.index.invalidate();
        trace!(%id, "inserted into space");
        Ok(())
    }

    /// Remove one object and return its entry.
    pub fn remove(&mut self, id: AgentId) -> SpaceResult<Entry> {
        let slot = self.slots.remove(&id).ok_or(SpaceError::UnknownObject(id))?;
        let entry = self.entries.swap_remove(slot);
        if let Some(moved) = self.entries.get(slot) {
            self.slots.insert(moved.id, slot);
        }
        self.populations.remove(&entry.population, id);
        self.index.invalidate();
        trace!(%id, "removed from space");
        Ok(entry)
    }

    /// Remove every object matching `predicate` in a single pass.
    ///
    /// Relative order of the survivors is preserved.  The index is
    /// invalidated once, and only if something was removed.  Returns the
    /// number of removed objects.
    pub fn remove_if<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Entry) -> bool,
    {
        let before = self.entries.len();
        let populations = &mut self.populations;
        self.entries.retain(|e| {
            if predicate(e) {
                populations.remove(&e.population, e.id);
                false
            } else {
                true
            }
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            self.reindex();
            self.index.invalidate();
        }
        removed
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Move one object by `motion`, clipped by the collision router.
    pub fn move_object(&mut self, id: AgentId, motion: Motion) -> SpaceResult<Projection> {
        let slot = *self.slots.get(&id).ok_or(SpaceError::UnknownObject(id))?;
        let entry = &mut self.entries[slot];
        if entry.apply(motion, self.router.as_ref()) {
            self.index.invalidate();
        }
        Ok(entry.projection)
    }

    /// Apply `motion_of(id)` to every stored object in parallel.
    ///
    /// Entries are split into chunks of at most `chunk_size` and each chunk
    /// is processed by one Rayon task, so no two tasks ever touch the same
    /// entry.  Runs on the current Rayon pool; wrap the call in
    /// `ThreadPool::install` to pick a specific one.  Returns the number of
    /// objects whose projection changed.
    pub fn move_all<F>(&mut self, chunk_size: usize, motion_of: F) -> usize
    where
        F: Fn(AgentId) -> Option<Motion> + Sync,
    {
        let router = self.router.as_ref();
        let moved: usize = self
            .entries
            .par_chunks_mut(chunk_size.max(1))
            .map(|chunk| {
                let mut changed = 0;
                for entry in chunk {
                    if let Some(motion) = motion_of(entry.id) {
                        changed += usize::from(entry.apply(motion, router));
                    }
                }
                changed
            })
            .sum();
        if moved > 0 {
            self.index.invalidate();
        }
        moved
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn entry(&self, id: AgentId) -> Option<&Entry> {
        self.slots.get(&id).map(|&slot| &self.entries[slot])
    }

    #[inline]
    pub fn projection(&self, id: AgentId) -> Option<Projection> {
        self.entry(id).map(|e| e.projection)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn count_population(&self, population: &PopulationKey) -> usize {
        self.populations.count(population)
    }

    /// Members of `population` in ascending id order.
    pub fn members<'a>(&'a self, population: &PopulationKey) -> impl Iterator<Item = AgentId> + use<'a> {
        self.populations.members(population)
    }

    pub fn populations(&self) -> &PopulationIndex {
        &self.populations
    }

    pub fn router(&self) -> &dyn CollisionRouter {
        self.router.as_ref()
    }

    pub fn grid(&self) -> Option<&TileGrid> {
        self.router.grid()
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Ids of all objects within `radius` of `center` (inclusive).
    pub fn find_within_radius(&self, center: Point2, radius: f64) -> Vec<AgentId> {
        self.index.within_radius(center, radius, || self.snapshot())
    }

    /// Up to `k` objects nearest to `center`, closest first.
    pub fn nearest(&self, center: Point2, k: usize) -> Vec<AgentId> {
        self.index.nearest(center, k, || self.snapshot())
    }

    /// Objects within `radius` of `id` (excluding `id`) for which
    /// `accept(&self_entry, &candidate)` holds.
    pub fn neighbours_of<F>(&self, id: AgentId, radius: f64, accept: F) -> Vec<&Entry>
    where
        F: Fn(&Entry, &Entry) -> bool,
    {
        let Some(me) = self.entry(id) else {
            return Vec::new();
        };
        self.find_within_radius(me.position(), radius)
            .into_iter()
            .filter(|&other| other != id)
            .filter_map(|other| self.entry(other))
            .filter(|candidate| accept(me, candidate))
            .collect()
    }

    /// All objects within `radius` of `id`, excluding `id` itself.
    pub fn neighbours(&self, id: AgentId, radius: f64) -> Vec<&Entry> {
        self.neighbours_of(id, radius, |_, _| true)
    }

    /// Neighbours within `radius` that `id` can see, i.e. with no wall on
    /// the straight line between the two positions.
    pub fn visible_neighbours(&self, id: AgentId, radius: f64) -> Vec<&Entry> {
        let router = self.router.as_ref();
        self.neighbours_of(id, radius, |me, other| router.is_visible(me.position(), other.position()))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn snapshot(&self) -> Vec<IndexedPoint> {
        self.entries.iter().map(|e| IndexedPoint::new(e.id, e.position())).collect()
    }

    fn reindex(&mut self) {
        self.slots.clear();
        self.slots.extend(self.entries.iter().enumerate().map(|(i, e)| (e.id, i)));
    }
}
