//! Storage backend trait definition.

use crate::error::StorageResult;

/// A durable byte slot.
///
/// Storage backends are **opaque byte stores** holding at most one blob.
/// drivesync owns all format interpretation; backends do not understand
/// record archives or settings maps.
///
/// # Invariants
///
/// - `read_all` returns exactly the bytes of the last successful `write_all`
/// - a failed `write_all` leaves the previous blob readable
/// - after `remove`, `read_all` returns `None` until the next write
/// - an empty blob is a valid value and differs from an absent one
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the whole blob, or `None` if nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the blob with `data`.
    ///
    /// After this returns successfully the new blob is expected to survive
    /// process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable. The previous
    /// blob is left in place in that case.
    fn write_all(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Removes the blob. Removing an absent blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn remove(&mut self) -> StorageResult<()>;

    /// Returns true if a blob is present.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.read_all()?.is_some())
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_all()
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        (**self).write_all(data)
    }

    fn remove(&mut self) -> StorageResult<()> {
        (**self).remove()
    }

    fn exists(&self) -> StorageResult<bool> {
        (**self).exists()
    }
}
