//! Environment variable snapshot and overlay.
//!
//! Process environment variables are read once into an [`Environment`] when
//! the resolver is constructed. Keys loaded from configuration files are
//! written into the same structure as an overlay, so the live process table
//! is never mutated (`std::env::set_var` is unsound once threads exist).
//! Tests construct an `Environment` from explicit pairs instead of touching
//! process globals.

use std::collections::HashMap;

/// A point-in-time view of environment variables plus configuration
/// overlays written during loads.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Captures the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// An environment with no variables set. Useful as a hermetic base for
    /// tests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Sets or overwrites a variable in the overlay.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Returns `true` if the variable is present.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
