//! Planar geometry: points, projections, and motion vectors.
//!
//! # Orientation convention
//!
//! Coordinates follow screen convention: `x` grows to the east and `y` grows
//! to the **south**, so tile row 0 is the northernmost row.  Headings are in
//! radians, measured clockwise from east:
//!
//! ```text
//!              NORTH (-π/2)
//!                   │
//!   WEST (π) ───────┼─────── EAST (0)
//!                   │
//!              SOUTH (π/2)
//! ```

use std::f64::consts::{FRAC_PI_2, PI, TAU};

// ── Point2 ────────────────────────────────────────────────────────────────────

/// A point in continuous world space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Cheaper than [`distance`](Self::distance)
    /// when only comparing against a squared radius.
    #[inline]
    pub fn distance_2(self, other: Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Point reached by travelling `distance` along `heading` from `self`.
    #[inline]
    pub fn offset(self, heading: f64, distance: f64) -> Point2 {
        Point2 {
            x: self.x + heading.cos() * distance,
            y: self.y + heading.sin() * distance,
        }
    }

    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Heading ───────────────────────────────────────────────────────────────────

/// Named compass headings in the engine's clockwise-from-east convention.
pub struct Heading;

impl Heading {
    pub const EAST: f64 = 0.0;
    pub const SOUTH: f64 = FRAC_PI_2;
    pub const WEST: f64 = PI;
    pub const NORTH: f64 = -FRAC_PI_2;
}

/// Fold an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

// ── Projection ────────────────────────────────────────────────────────────────

/// An object's position and orientation in world space.
///
/// `collided` records whether the move that produced this projection was
/// clipped by a wall; it is cleared by the next unobstructed move.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub position: Point2,
    pub orientation: f64,
    pub collided: bool,
}

impl Projection {
    pub fn at(x: f64, y: f64) -> Self {
        Self { position: Point2::new(x, y), orientation: Heading::EAST, collided: false }
    }

    pub fn with_orientation(mut self, orientation: f64) -> Self {
        self.orientation = normalize_angle(orientation);
        self
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

/// A per-step motion request: turn by `rotation`, then advance by
/// `translation` along the new heading.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motion {
    pub rotation: f64,
    pub translation: f64,
}

impl Motion {
    pub const NONE: Motion = Motion { rotation: 0.0, translation: 0.0 };

    /// Negative or non-finite translations are clamped to zero.
    pub fn new(rotation: f64, translation: f64) -> Self {
        let translation = if translation.is_finite() { translation.max(0.0) } else { 0.0 };
        let rotation = if rotation.is_finite() { rotation } else { 0.0 };
        Self { rotation, translation }
    }

    /// Turn from `current` to face `heading`, then advance `translation`.
    pub fn toward(current: f64, heading: f64, translation: f64) -> Self {
        Self::new(normalize_angle(heading - current), translation)
    }

    #[inline]
    pub fn is_still(&self) -> bool {
        self.translation == 0.0 && self.rotation == 0.0
    }

    /// Orientation and preferred (unclipped) destination after applying this
    /// motion to `from`.
    ///
    /// The fields are public, so they are clamped again here the same way
    /// [`Motion::new`] clamps them.
    pub fn apply(&self, from: &Projection) -> (f64, Point2) {
        let Motion { rotation, translation } = Motion::new(self.rotation, self.translation);
        let orientation = normalize_angle(from.orientation + rotation);
        let destination = if translation > 0.0 {
            from.position.offset(orientation, translation)
        } else {
            from.position
        };
        (orientation, destination)
    }
}
