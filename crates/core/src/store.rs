//! String-keyed storage abstraction
//!
//! The browser persists credentials in `localStorage`; everything above this
//! trait only sees get/set/remove by key, so hosts and tests can substitute
//! their own backing store.

use crate::error::{PortalError, PortalResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// Key-value store holding string values under string keys
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> PortalResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> PortalResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> PortalResult<()>;
}

/// In-memory store for native hosts and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| PortalError::storage("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::storage("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortalResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| PortalError::storage("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
