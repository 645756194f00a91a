//! `eco-space`: tiled space, collision routing, and spatial indexing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`grid`]       | `TileGrid`, `Tile`, `Direction`, `WallMask`                  |
//! | [`router`]     | `CollisionRouter` trait, `TileRouter`, `Transition`          |
//! | [`index`]      | `SpatialIndex`: memoized R-tree with an outdated flag       |
//! | [`population`] | `PopulationIndex`: population key → member ids              |
//! | [`store`]      | `Space`: the positioned-object store                        |
//! | [`loader`]     | `load_walls_csv`, `load_walls_reader`                        |
//! | [`error`]      | `SpaceError`, `SpaceResult<T>`                               |
//!
//! # Concurrency
//!
//! Structural mutation (`insert`, `remove`, `remove_if`) takes `&mut Space`
//! and therefore happens on one thread.  `move_all` rewrites existing
//! positions in parallel over disjoint chunks.  Queries take `&Space` and may
//! run concurrently; the first query after a mutation rebuilds the R-tree
//! under the index's own lock.

pub mod error;
pub mod grid;
pub mod index;
pub mod loader;
pub mod population;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{SpaceError, SpaceResult};
pub use grid::{Direction, Tile, TileGrid, WallMask};
pub use index::SpatialIndex;
pub use loader::{WallSpec, load_walls_csv, load_walls_reader};
pub use population::PopulationIndex;
pub use router::{CollisionRouter, TileRouter, Transition};
pub use store::{Entry, Space};
