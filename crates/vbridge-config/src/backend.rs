//! Key/value configuration backend consumed by the port store.
//!
//! # Design
//! - The backend is an external, thread-safe collaborator; the trait mirrors
//!   its contract (typed reads with a caller-supplied default, string writes).
//! - `MemoryBackend` is the bundled implementation for embedders without a
//!   store of their own.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::error;

/// Generic configuration store the bridge reads its settings from.
pub trait ConfigBackend: Send + Sync {
    /// Read an integer, returning `default` when absent or unparsable.
    fn get_int(&self, key: &str, default: i32) -> i32;

    /// Read a boolean, returning `default` when absent or unparsable.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Store a value in its native string form.
    fn set_property(&self, key: &str, value: &str);
}

/// Thread-safe in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Construct an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a backend pre-populated with raw values.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Raw stored value for `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Remove `key` entirely, as an external editor of the store might.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.write().remove(key)
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        match self.values.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("config backend lock poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        match self.values.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("config backend lock poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }
}

impl ConfigBackend for MemoryBackend {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.read()
            .get(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.read().get(key).map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(raw) if raw == "true" => true,
            Some(raw) if raw == "false" => false,
            _ => default,
        }
    }

    fn set_property(&self, key: &str, value: &str) {
        self.write().insert(key.to_string(), value.to_string());
    }
}
