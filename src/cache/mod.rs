//! In-memory configuration cache.
//!
//! A flat key/value store shared between the resolver's load path and every
//! lookup. Reads take a shared lock; `set` and `flush` take the exclusive
//! lock for the duration of the mutation. Unbounded and process-lifetime:
//! no eviction, no TTL, no persistence.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Thread-safe flat key/value store.
#[derive(Debug, Default)]
pub struct Cache {
    data: RwLock<HashMap<String, String>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value. A missing key is `None`, never an error.
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Adds or updates an entry.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().insert(key.into(), value.into());
    }

    /// Atomically discards all entries.
    pub fn flush(&self) {
        self.data.write().clear();
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
