//! Per-step key/value scratch storage shared by all agents.
//!
//! Agents use it to publish values that other agents read later in the same
//! step (population-wide aggregates, "food claimed at tile X", ...).  The
//! engine clears it at the end of every step.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

type Value = Arc<dyn Any + Send + Sync>;

/// Concurrent string-keyed map of type-erased values.
#[derive(Default)]
pub struct StepSnapshot {
    map: RwLock<FxHashMap<String, Value>>,
}

impl StepSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.map.write().insert(key.into(), Arc::new(value));
    }

    /// Store `value` only if `key` is vacant.  Returns `true` if it was
    /// stored, i.e. the caller won the key.
    pub fn insert_if_absent<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> bool {
        let mut map = self.map.write();
        let key = key.into();
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, Arc::new(value));
        true
    }

    /// The value under `key`, if present and of type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.map.read().get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    pub fn clear(&mut self) {
        self.map.get_mut().clear();
    }
}

impl std::fmt::Debug for StepSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepSnapshot").field("len", &self.len()).finish()
    }
}
