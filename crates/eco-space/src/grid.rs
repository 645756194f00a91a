//! Rectangular tile grid with per-edge walls.
//!
//! # Layout
//!
//! A `width × height` grid of unit tiles.  Tile `(x, y)` covers the half-open
//! box `[x, x+1) × [y, y+1)` in world space; row 0 is the northern edge (see
//! the orientation convention in `eco_core::geo`).
//!
//! Each tile stores a 4-bit [`WallMask`].  Setting a wall also sets the
//! opposite bit on the neighbouring tile so both sides agree.  Border tiles
//! additionally carry their outward bits implicitly: [`TileGrid::walls`]
//! ORs them in on every lookup, so they cannot be cleared.

use std::fmt;

use eco_core::Point2;

use crate::{SpaceError, SpaceResult};

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four tile edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in edge-test priority order.
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::East => 0b0010,
            Direction::South => 0b0100,
            Direction::West => 0b1000,
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Tile-coordinate step `(dx, dy)` towards the neighbour on this edge.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Parse `N`/`E`/`S`/`W` or the full lowercase name.
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "e" | "east" => Some(Direction::East),
            "s" | "south" => Some(Direction::South),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        f.write_str(s)
    }
}

// ── WallMask ──────────────────────────────────────────────────────────────────

/// Set of walled edges of one tile.  Only the low four bits are used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallMask(u8);

impl WallMask {
    pub const EMPTY: WallMask = WallMask(0);
    pub const ALL: WallMask = WallMask(0b1111);

    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        WallMask(bits & 0b1111)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub fn with(self, dir: Direction) -> Self {
        WallMask(self.0 | dir.bit())
    }

    #[inline]
    pub fn without(self, dir: Direction) -> Self {
        WallMask(self.0 & !dir.bit())
    }

    #[inline]
    pub fn union(self, other: WallMask) -> Self {
        WallMask(self.0 | other.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ── Tile ──────────────────────────────────────────────────────────────────────

/// Read-only view of one grid cell.  `walls` already includes border bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub walls: WallMask,
}

impl Tile {
    #[inline]
    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls.contains(dir)
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.x as f64 + 0.5, self.y as f64 + 0.5)
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Fixed-size grid of tiles with explicit (stored) and implicit (border) walls.
///
/// Walls are edited while the space is being set up; during a simulation the
/// grid is read-only and shared by the collision router across threads.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: u32,
    height: u32,
    /// Explicit walls, row-major (`y * width + x`).
    walls: Vec<WallMask>,
}

impl TileGrid {
    /// Create an open `width × height` grid (only border walls).
    pub fn new(width: u32, height: u32) -> SpaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpaceError::InvalidGrid(format!(
                "grid must be at least 1×1, got {width}×{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            walls: vec![WallMask::EMPTY; width as usize * height as usize],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` if `p` lies inside `[0, width) × [0, height)`.
    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.width as f64 && p.y < self.height as f64
    }

    /// Integer coordinates of the tile containing `p`, or `None` outside the grid.
    #[inline]
    pub fn tile_coords(&self, p: Point2) -> Option<(u32, u32)> {
        if !self.contains(p) {
            return None;
        }
        let x = (p.x.floor() as u32).min(self.width - 1);
        let y = (p.y.floor() as u32).min(self.height - 1);
        Some((x, y))
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Tile { x, y, walls: self.walls(x, y) })
    }

    pub fn tile_at(&self, p: Point2) -> Option<Tile> {
        self.tile_coords(p).and_then(|(x, y)| self.tile(x, y))
    }

    /// Outward edges of `(x, y)` that lie on the grid border.
    fn border_mask(&self, x: u32, y: u32) -> WallMask {
        let mut mask = WallMask::EMPTY;
        if y == 0 {
            mask = mask.with(Direction::North);
        }
        if x + 1 == self.width {
            mask = mask.with(Direction::East);
        }
        if y + 1 == self.height {
            mask = mask.with(Direction::South);
        }
        if x == 0 {
            mask = mask.with(Direction::West);
        }
        mask
    }

    /// Effective walls of an in-bounds tile (explicit ∪ border).
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn walls(&self, x: u32, y: u32) -> WallMask {
        self.walls[self.idx(x, y)].union(self.border_mask(x, y))
    }

    /// `false` for out-of-bounds tiles.
    #[inline]
    pub fn has_wall(&self, x: u32, y: u32, dir: Direction) -> bool {
        x < self.width && y < self.height && self.walls(x, y).contains(dir)
    }

    /// Neighbour of `(x, y)` across `dir`, or `None` at the grid edge.
    #[inline]
    pub fn neighbour(&self, x: u32, y: u32, dir: Direction) -> Option<(u32, u32)> {
        let (dx, dy) = dir.offset();
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
            return None;
        }
        Some((nx as u32, ny as u32))
    }

    /// Add or remove the wall on edge `dir` of tile `(x, y)`.
    ///
    /// The neighbouring tile's opposite edge is updated to match.  Border
    /// walls stay in effect even when `walled == false`.
    pub fn set_wall(&mut self, x: u32, y: u32, dir: Direction, walled: bool) -> SpaceResult<()> {
        if x >= self.width || y >= self.height {
            return Err(SpaceError::TileOutOfBounds { x, y });
        }
        self.set_bit(x, y, dir, walled);
        if let Some((nx, ny)) = self.neighbour(x, y, dir) {
            self.set_bit(nx, ny, dir.opposite(), walled);
        }
        Ok(())
    }

    /// Number of tiles with at least one explicit wall.
    pub fn walled_tile_count(&self) -> usize {
        self.walls.iter().filter(|m| !m.is_empty()).count()
    }

    fn set_bit(&mut self, x: u32, y: u32, dir: Direction, walled: bool) {
        let i = self.idx(x, y);
        self.walls[i] = if walled { self.walls[i].with(dir) } else { self.walls[i].without(dir) };
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
