//! A small persisted string map.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::collections::BTreeMap;

/// A string key-value map persisted as JSON in a [`StorageBackend`].
///
/// Every mutation is written through before it becomes visible. If the write
/// fails, the in-memory map keeps its previous contents, so readers never see
/// a value that is not durable.
///
/// # Example
///
/// ```rust
/// use drivesync_storage::{InMemoryBackend, KeyValueStore};
///
/// let mut settings = KeyValueStore::open(InMemoryBackend::new()).unwrap();
/// settings.set("syncToken", "abc").unwrap();
/// assert_eq!(settings.get("syncToken"), Some("abc"));
/// settings.remove("syncToken").unwrap();
/// assert_eq!(settings.get("syncToken"), None);
/// ```
#[derive(Debug)]
pub struct KeyValueStore<B: StorageBackend> {
    backend: B,
    entries: BTreeMap<String, String>,
}

impl<B: StorageBackend> KeyValueStore<B> {
    /// Opens the map stored in `backend`.
    ///
    /// Unreadable content is logged and treated as an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself fails to read.
    pub fn open(backend: B) -> StorageResult<Self> {
        let entries = match backend.read_all()? {
            Some(bytes) => decode(&bytes).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable settings");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };

        Ok(Self { backend, entries })
    }

    /// Creates an empty map without reading `backend`.
    ///
    /// The first mutation overwrites whatever the backend held.
    pub fn empty(backend: B) -> Self {
        Self {
            backend,
            entries: BTreeMap::new(),
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sets `key` to `value` and persists the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be persisted; the old value stays.
    pub fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.get(key) == Some(value) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.commit(next)
    }

    /// Removes `key` and persists the map. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be persisted; the old value stays.
    pub fn remove(&mut self, key: &str) -> StorageResult<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }

    /// Returns all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn commit(&mut self, next: BTreeMap<String, String>) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(&next)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.backend.write_all(&bytes)?;
        self.entries = next;
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> StorageResult<BTreeMap<String, String>> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupted(e.to_string()))
}
