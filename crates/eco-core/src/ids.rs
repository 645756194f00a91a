//! Strongly typed identifiers.
//!
//! `AgentId` is a zero-cost `u32` wrapper that is `Copy + Ord + Hash` so it
//! can key maps and sorted collections without ceremony.  `PopulationKey` is
//! a cheap-to-clone interned string naming a population (the bucket shared by
//! a prototype, its pool, and its population-index entry).

use std::fmt;
use std::sync::Arc;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID": equivalent to `MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for use as a `Vec` index or hash seed.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The ID following `self`.  Used by the engine's monotonic
            /// allocator; never yields `INVALID` without overflowing first.
            #[inline]
            pub fn next(self) -> Option<$name> {
                self.0.checked_add(1).filter(|&n| n != <$inner>::MAX).map($name)
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Identity of an agent, unique for the lifetime of a simulation.
    ///
    /// Assigned monotonically at activation.  A recycled agent instance gets
    /// a fresh `AgentId`; ids of removed agents are never handed out again.
    pub struct AgentId(u32);
}

// ── PopulationKey ─────────────────────────────────────────────────────────────

/// Name of a population / group.
///
/// Cloning is a reference-count bump, so keys can be stored per agent, per
/// pool bucket and per index bucket without string copies.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopulationKey(Arc<str>);

impl PopulationKey {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PopulationKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PopulationKey {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Debug for PopulationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for PopulationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PopulationKey {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PopulationKey {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d).map(PopulationKey::from)
    }
}
