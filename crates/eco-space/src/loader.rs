//! CSV wall loader.
//!
//! # CSV format
//!
//! One row per walled edge.  `direction` accepts `N`/`E`/`S`/`W` or the
//! full lowercase name.
//!
//! ```csv
//! x,y,direction
//! 0,0,E
//! 1,0,west
//! 2,3,S
//! ```
//!
//! Walls are symmetric: the row `0,0,E` and the row `1,0,W` describe the same
//! edge, and either one is enough.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{Direction, SpaceError, SpaceResult, TileGrid};

#[derive(Deserialize)]
struct WallRecord {
    x: u32,
    y: u32,
    direction: String,
}

/// One walled tile edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WallSpec {
    pub x: u32,
    pub y: u32,
    pub direction: Direction,
}

impl WallSpec {
    pub fn new(x: u32, y: u32, direction: Direction) -> Self {
        Self { x, y, direction }
    }
}

/// Load wall specifications from a CSV file.
pub fn load_walls_csv(path: &Path) -> SpaceResult<Vec<WallSpec>> {
    let file = std::fs::File::open(path)?;
    load_walls_reader(file)
}

/// Like [`load_walls_csv`] but accepts any `Read` source.
pub fn load_walls_reader<R: Read>(reader: R) -> SpaceResult<Vec<WallSpec>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut walls = Vec::new();
    for (line, result) in csv_reader.deserialize::<WallRecord>().enumerate() {
        let row = result.map_err(|e| SpaceError::Parse(e.to_string()))?;
        let direction = Direction::parse(&row.direction).ok_or_else(|| {
            SpaceError::Parse(format!(
                "row {}: invalid direction {:?}, expected N, E, S or W",
                line + 1,
                row.direction
            ))
        })?;
        walls.push(WallSpec::new(row.x, row.y, direction));
    }
    Ok(walls)
}

impl TileGrid {
    /// Set every wall in `walls`.  Stops at the first out-of-grid tile;
    /// walls applied before it stay set.
    pub fn apply_walls(&mut self, walls: &[WallSpec]) -> SpaceResult<()> {
        for w in walls {
            self.set_wall(w.x, w.y, w.direction, true)?;
        }
        Ok(())
    }
}
