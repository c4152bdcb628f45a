//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// This backend stores its blob in a single file. Data survives process
/// restarts.
///
/// # Durability
///
/// Writes use the write-then-rename pattern:
/// 1. Write to `<file>.tmp`
/// 2. `sync_all` the temporary file
/// 3. Rename it over the target
/// 4. Fsync the parent directory so the rename is durable
///
/// A crash at any point leaves either the old or the new blob, never a torn one.
///
/// # Example
///
/// ```no_run
/// use drivesync_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("fileRecords.archive")).unwrap();
/// backend.write_all(b"persistent data").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    temp_path: PathBuf,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The file is not created until the first write. A stale temporary file
    /// left by an interrupted write is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the stale temporary file cannot be removed.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let mut temp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        match fs::remove_file(&temp_path) {
            Ok(()) => tracing::debug!(path = %temp_path.display(), "removed stale temp file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            path: path.to_path_buf(),
            temp_path,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> StorageResult<()> {
        // NTFS journals directory metadata
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut file = File::create(&self.temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.path)?;
        self.sync_parent()
    }

    fn remove(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => self.sync_parent(),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.try_exists()?)
    }
}
