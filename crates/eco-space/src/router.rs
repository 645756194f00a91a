//! Wall-aware collision routing over a [`TileGrid`].
//!
//! # Algorithm
//!
//! [`TileRouter::max_transition`] walks the tiles crossed by the straight
//! segment `origin → destination`, starting in the origin's tile:
//!
//! 1. If the destination lies in the current tile, the segment ends here.
//! 2. Otherwise find the edge(s) through which the segment leaves the tile.
//!    Only edges facing the direction of travel are candidates (a segment
//!    heading north-east can leave through N or E, never S or W).  At an
//!    exact corner both edges are candidates.
//! 3. The walls of every candidate are checked first, in N, E, S, W order;
//!    the first walled one ends the walk at the crossing point.
//! 4. Otherwise the walk continues into each candidate's neighbour and the
//!    hit nearest to the origin wins (the earlier candidate on a tie).
//!
//! A corner is therefore passable only when all four edges meeting there
//! are open: the two of the current tile, then the two of the diagonal
//! tile, which the side neighbours see as their own exit edges.
//!
//! The grid border behaves as a wall on every outward edge.  A collision
//! point sits exactly on a tile edge, so it is nudged by one representable
//! step back into the tile being traversed before it is returned.  The
//! result therefore always belongs to an unambiguous tile.
//!
//! The router holds no mutable state and is shared by all movement tasks.

use eco_core::Point2;
use rustc_hash::FxHashMap;

use crate::{Direction, TileGrid};

/// Relative tolerance on the exit-parameter comparison used to detect
/// corner crossings.
const CORNER_EPS: f64 = 1e-12;

// ── Transition ────────────────────────────────────────────────────────────────

/// The result of a collision query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    /// Furthest reachable point along the segment.
    pub point: Point2,
    /// Edge that stopped the movement, if any.
    pub collision: Option<Direction>,
}

impl Transition {
    #[inline]
    pub fn free(point: Point2) -> Self {
        Self { point, collision: None }
    }

    #[inline]
    pub fn collided(&self) -> bool {
        self.collision.is_some()
    }
}

// ── CollisionRouter trait ─────────────────────────────────────────────────────

/// Pluggable movement clipping.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the movement sub-phase calls them
/// from many Rayon workers at once.
pub trait CollisionRouter: Send + Sync {
    /// `true` if `p` is a legal position in this space.
    fn contains(&self, p: Point2) -> bool;

    /// Furthest point reachable from `origin` towards `destination`.
    fn max_transition(&self, origin: Point2, destination: Point2) -> Transition;

    /// Line-of-sight test: `true` if no wall lies between `from` and `to`.
    fn is_visible(&self, from: Point2, to: Point2) -> bool {
        !self.max_transition(from, to).collided()
    }

    /// The tile grid backing this router, if it has one.
    fn grid(&self) -> Option<&TileGrid> {
        None
    }
}

// ── TileRouter ────────────────────────────────────────────────────────────────

/// [`CollisionRouter`] over the walls of a [`TileGrid`].
#[derive(Clone, Debug)]
pub struct TileRouter {
    grid: TileGrid,
}

/// A wall crossing found while walking the segment.
#[derive(Copy, Clone, Debug)]
struct Hit {
    tile: (u32, u32),
    edge: Direction,
    point: Point2,
}

/// The segment being traced, with its direction vector precomputed.
struct Segment {
    from: Point2,
    to: Point2,
    dx: f64,
    dy: f64,
}

impl Segment {
    fn new(from: Point2, to: Point2) -> Self {
        Self { from, to, dx: to.x - from.x, dy: to.y - from.y }
    }

    #[inline]
    fn at(&self, t: f64) -> Point2 {
        Point2::new(self.from.x + self.dx * t, self.from.y + self.dy * t)
    }

    /// Edges through which the segment leaves tile `(x, y)`, with the
    /// crossing points, in N, E, S, W order.  Two entries mean an exact
    /// corner crossing.
    fn exits(&self, x: u32, y: u32) -> Vec<(Direction, Point2)> {
        let (x0, y0) = (x as f64, y as f64);
        let (x1, y1) = (x0 + 1.0, y0 + 1.0);

        let (x_edge, tx) = if self.dx > 0.0 {
            (Some(Direction::East), (x1 - self.from.x) / self.dx)
        } else if self.dx < 0.0 {
            (Some(Direction::West), (x0 - self.from.x) / self.dx)
        } else {
            (None, f64::INFINITY)
        };
        let (y_edge, ty) = if self.dy < 0.0 {
            (Some(Direction::North), (y0 - self.from.y) / self.dy)
        } else if self.dy > 0.0 {
            (Some(Direction::South), (y1 - self.from.y) / self.dy)
        } else {
            (None, f64::INFINITY)
        };

        let t = tx.min(ty).max(0.0);
        if !t.is_finite() {
            return Vec::new();
        }
        let tol = CORNER_EPS * t.abs().max(1.0);
        if t > 1.0 + tol {
            // The segment ends inside this tile (float disagreement with
            // `tile_coords` on an edge coordinate).
            return Vec::new();
        }
        let point = self.at(t);

        let mut exits = Vec::with_capacity(2);
        for dir in Direction::ALL {
            let hit = match dir {
                Direction::North | Direction::South => {
                    y_edge == Some(dir) && (ty.max(0.0) - t).abs() <= tol
                }
                Direction::East | Direction::West => {
                    x_edge == Some(dir) && (tx.max(0.0) - t).abs() <= tol
                }
            };
            if hit {
                exits.push((dir, snap_to_edge(point, x, y, dir)));
            }
        }
        exits
    }
}

impl TileRouter {
    pub fn new(grid: TileGrid) -> Self {
        Self { grid }
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    /// Walk the segment from `tile` and return the nearest wall crossing.
    ///
    /// The outcome from a tile depends only on the tile, so `memo` caches it
    /// and repeated corner branching stays linear in the number of tiles.
    fn trace(&self, tile: (u32, u32), seg: &Segment, memo: &mut FxHashMap<(u32, u32), Option<Hit>>) -> Option<Hit> {
        if self.grid.tile_coords(seg.to) == Some(tile) {
            return None;
        }
        if let Some(&known) = memo.get(&tile) {
            return known;
        }

        let (x, y) = tile;
        let exits = seg.exits(x, y);
        let walls = self.grid.walls(x, y);
        let walled = exits
            .iter()
            .find(|(edge, _)| walls.contains(*edge))
            .map(|&(edge, point)| Hit { tile, edge, point });

        let hit = walled.or_else(|| {
            let mut nearest: Option<(f64, Hit)> = None;
            for &(edge, point) in &exits {
                let found = match self.grid.neighbour(x, y, edge) {
                    Some(next) => self.trace(next, seg, memo),
                    // Unreachable while border bits are set; kept as a wall.
                    None => Some(Hit { tile, edge, point }),
                };
                if let Some(found) = found {
                    let d = found.point.distance_2(seg.from);
                    if nearest.is_none_or(|(best, _)| d < best) {
                        nearest = Some((d, found));
                    }
                }
            }
            nearest.map(|(_, hit)| hit)
        });
        memo.insert(tile, hit);
        hit
    }
}

impl CollisionRouter for TileRouter {
    #[inline]
    fn contains(&self, p: Point2) -> bool {
        self.grid.contains(p)
    }

    fn grid(&self) -> Option<&TileGrid> {
        Some(&self.grid)
    }

    fn max_transition(&self, origin: Point2, destination: Point2) -> Transition {
        if origin == destination {
            return Transition::free(destination);
        }
        if !destination.x.is_finite() || !destination.y.is_finite() {
            return Transition::free(origin);
        }
        let Some(start) = self.grid.tile_coords(origin) else {
            // Objects outside the grid cannot be routed; they stay put.
            return Transition::free(origin);
        };

        let seg = Segment::new(origin, destination);
        let mut memo = FxHashMap::default();
        match self.trace(start, &seg, &mut memo) {
            None => Transition::free(destination),
            Some(hit) => Transition {
                point: nudge_into_tile(hit.point, hit.tile),
                collision: Some(hit.edge),
            },
        }
    }
}

// ── Float helpers ─────────────────────────────────────────────────────────────

/// Put the crossing coordinate exactly on the edge line of tile `(x, y)`.
fn snap_to_edge(mut p: Point2, x: u32, y: u32, edge: Direction) -> Point2 {
    match edge {
        Direction::North => p.y = y as f64,
        Direction::South => p.y = y as f64 + 1.0,
        Direction::West => p.x = x as f64,
        Direction::East => p.x = x as f64 + 1.0,
    }
    p
}

/// Move `p` by the smallest representable step(s) so it lies strictly inside
/// the open box of tile `(x, y)`.
fn nudge_into_tile(p: Point2, (x, y): (u32, u32)) -> Point2 {
    Point2::new(nudge_into(p.x, x as f64), nudge_into(p.y, y as f64))
}

fn nudge_into(v: f64, lo: f64) -> f64 {
    let hi = lo + 1.0;
    if v <= lo {
        next_up(lo)
    } else if v >= hi {
        next_down(hi)
    } else {
        v
    }
}

/// Smallest `f64` strictly greater than `v`.
pub(crate) fn next_up(v: f64) -> f64 {
    if v.is_nan() || v == f64::INFINITY {
        return v;
    }
    if v == 0.0 {
        return f64::from_bits(1);
    }
    let bits = v.to_bits();
    if v > 0.0 { f64::from_bits(bits + 1) } else { f64::from_bits(bits - 1) }
}

/// Largest `f64` strictly less than `v`.
pub(crate) fn next_down(v: f64) -> f64 {
    -next_up(-v)
}
