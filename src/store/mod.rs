//! Persistent key-value store
//!
//! All cache entries and the local login flag live in a flat string-to-string
//! namespace. Callers hold it as `Arc<dyn KeyValueStore>` so tests can swap in
//! [`MemoryStore`].

pub mod sqlite;

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::StoreError;

pub use sqlite::SqliteStore;

type Result<T> = std::result::Result<T, StoreError>;

/// Synchronous string key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored at `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` at `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory store, lost on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
