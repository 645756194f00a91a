//! Memoized R-tree over object positions.
//!
//! # Caching contract
//!
//! Rebuilding the tree is O(n log n), so it is never done eagerly.  Every
//! store mutation calls [`SpatialIndex::invalidate`], which only sets the
//! outdated flag.  The first query after that rebuilds from the store's full
//! snapshot, clears the flag, and answers; later queries reuse the tree.
//!
//! Queries take `&self` and may run on many threads at once.  The tree and
//! flag live behind one `RwLock`:
//!
//! - fresh tree → plain shared read, queries proceed concurrently;
//! - outdated → the caller takes an upgradable read (exclusive among
//!   upgraders, compatible with readers), re-checks the flag, and only then
//!   upgrades to rebuild.  Exactly one rebuild happens per invalidation and
//!   no reader ever sees a half-built tree.

use parking_lot::{RwLock, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::trace;

use eco_core::{AgentId, Point2};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D point with the owning object's id.
#[derive(Clone, Debug)]
pub struct IndexedPoint {
    point: [f64; 2],
    id: AgentId,
}

impl IndexedPoint {
    #[inline]
    pub fn new(id: AgentId, position: Point2) -> Self {
        Self { point: position.as_array(), id }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

struct IndexState {
    tree: RTree<IndexedPoint>,
    outdated: bool,
    rebuilds: u64,
}

/// Lazily rebuilt nearest-neighbour structure.
pub struct SpatialIndex {
    state: RwLock<IndexState>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(IndexState { tree: RTree::new(), outdated: false, rebuilds: 0 }),
        }
    }

    /// Mark the tree stale.  Exclusive access means no query is in flight.
    #[inline]
    pub fn invalidate(&mut self) {
        self.state.get_mut().outdated = true;
    }

    pub fn is_outdated(&self) -> bool {
        self.state.read().outdated
    }

    /// Number of rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.state.read().rebuilds
    }

    /// Ids of all points within `radius` of `center` (inclusive).
    ///
    /// `snapshot` is called only when a rebuild is needed.
    pub fn within_radius<F>(&self, center: Point2, radius: f64, snapshot: F) -> Vec<AgentId>
    where
        F: FnOnce() -> Vec<IndexedPoint>,
    {
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let state = self.fresh(snapshot);
        state
            .tree
            .locate_within_distance(center.as_array(), radius * radius)
            .map(|e| e.id)
            .collect()
    }

    /// Up to `k` ids nearest to `center`, sorted by ascending distance.
    pub fn nearest<F>(&self, center: Point2, k: usize, snapshot: F) -> Vec<AgentId>
    where
        F: FnOnce() -> Vec<IndexedPoint>,
    {
        let state = self.fresh(snapshot);
        state
            .tree
            .nearest_neighbor_iter(&center.as_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Shared guard over an up-to-date tree, rebuilding first if needed.
    fn fresh<F>(&self, snapshot: F) -> RwLockReadGuard<'_, IndexState>
    where
        F: FnOnce() -> Vec<IndexedPoint>,
    {
        let read = self.state.read();
        if !read.outdated {
            return read;
        }
        drop(read);

        let upgradable = self.state.upgradable_read();
        if !upgradable.outdated {
            // Another query rebuilt while we waited.
            return RwLockUpgradableReadGuard::downgrade(upgradable);
        }
        let mut write = RwLockUpgradableReadGuard::upgrade(upgradable);
        let entries = snapshot();
        trace!(objects = entries.len(), "rebuilding spatial index");
        write.tree = RTree::bulk_load(entries);
        write.outdated = false;
        write.rebuilds += 1;
        RwLockWriteGuard::downgrade(write)
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
