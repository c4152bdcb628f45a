//! Data directory management.
//!
//! This module handles the file system layout of a store:
//!
//! ```text
//! <data_dir>/
//! ├─ LOCK                  # Advisory lock for single-process access
//! ├─ fileRecords.archive   # Record archive
//! └─ settings.json         # Settings slot (continuation token)
//! ```
//!
//! Only one process may sync a data directory at a time; the LOCK file
//! enforces this across processes the way the sync driver's cycle guard does
//! within one.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";

/// Manages the data directory and holds its exclusive lock.
///
/// The lock is released when the `DataDir` is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use drivesync_core::{DataDir, StoreConfig};
/// use std::path::Path;
///
/// let dir = DataDir::open(Path::new("drive_data"), &StoreConfig::default()).unwrap();
/// println!("archive: {}", dir.records_path().display());
/// ```
#[derive(Debug)]
pub struct DataDir {
    path: PathBuf,
    records_file: String,
    settings_file: String,
    _lock_file: File,
}

impl DataDir {
    /// Opens or creates a data directory and locks it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist and `create_if_missing` is false
    /// - The path is not a directory
    /// - Another process holds the lock (`DirectoryLocked`)
    /// - I/O errors occur
    pub fn open(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        if !path.exists() {
            if config.create_if_missing {
                fs::create_dir_all(path)?;
            } else {
                return Err(CoreError::invalid_format(format!(
                    "data directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if !path.is_dir() {
            return Err(CoreError::invalid_format(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(CoreError::DirectoryLocked {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), "locked data directory");

        Ok(Self {
            path: path.to_path_buf(),
            records_file: config.records_file.clone(),
            settings_file: config.settings_file.clone(),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the record archive.
    #[must_use]
    pub fn records_path(&self) -> PathBuf {
        self.path.join(&self.records_file)
    }

    /// Returns the path to the settings slot.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.path.join(&self.settings_file)
    }
}
