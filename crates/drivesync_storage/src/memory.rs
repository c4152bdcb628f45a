//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend keeps its blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same slot, so a test can keep a handle after moving a
/// clone into a store and observe exactly what was persisted.
///
/// # Example
///
/// ```rust
/// use drivesync_storage::{StorageBackend, InMemoryBackend};
///
/// let handle = InMemoryBackend::new();
/// let mut backend = handle.clone();
/// backend.write_all(b"test data").unwrap();
/// assert_eq!(handle.data(), Some(b"test data".to_vec()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<Option<Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<RwLock<u64>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing blob.
    ///
    /// Useful for testing load and recovery scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        let backend = Self::default();
        *backend.data.write() = Some(data);
        backend
    }

    /// Returns a copy of the current blob.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Makes every subsequent `write_all` fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        *self.writes.read()
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected write failure",
            )));
        }
        *self.data.write() = Some(data.to_vec());
        *self.writes.write() += 1;
        Ok(())
    }

    fn remove(&mut self) -> StorageResult<()> {
        *self.data.write() = None;
        Ok(())
    }
}
