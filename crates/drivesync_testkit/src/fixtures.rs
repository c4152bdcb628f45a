//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up record stores, drivers
//! and common delta pages.

use drivesync_core::{RecordStore, StoreConfig};
use drivesync_engine::{MockDeltaSource, SyncConfig, SyncDriver};
use drivesync_protocol::{DeltaItem, DeltaPage};
use drivesync_storage::InMemoryBackend;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Folder ID tracked by fixtures.
pub const TRACKED_FOLDER: &str = "F";

/// Timestamp used by item helpers.
pub const FIXED_TIME: &str = "2016-03-01 10:00:00";

/// A record store over in-memory backends, with handles to both backends.
pub struct TestStore {
    /// The store.
    pub store: RecordStore,
    /// Archive backend shared with the store.
    pub archive: InMemoryBackend,
    /// Settings backend shared with the store.
    pub settings: InMemoryBackend,
}

impl TestStore {
    /// Creates an empty store.
    pub fn memory() -> Self {
        let archive = InMemoryBackend::new();
        let settings = InMemoryBackend::new();
        let store = RecordStore::with_backends(
            Box::new(archive.clone()),
            Box::new(settings.clone()),
            &StoreConfig::default(),
        )
        .expect("Failed to open in-memory store");
        Self {
            store,
            archive,
            settings,
        }
    }

    /// Opens a second store over the same backends, as a restart would.
    pub fn reopen(&self) -> RecordStore {
        RecordStore::with_backends(
            Box::new(self.archive.clone()),
            Box::new(self.settings.clone()),
            &StoreConfig::default(),
        )
        .expect("Failed to reopen in-memory store")
    }
}

impl std::ops::Deref for TestStore {
    type Target = RecordStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// A temporary data directory removed on drop.
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Opens the store in this directory. Only one may be open at a time.
    pub fn open_store(&self) -> RecordStore {
        RecordStore::open(self.path(), &StoreConfig::default()).expect("Failed to open store")
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A driver over a scripted source and an in-memory store.
pub struct DriverFixture {
    /// The scripted source, shared with the driver.
    pub source: Arc<MockDeltaSource>,
    /// Archive backend of the driver's store.
    pub archive: InMemoryBackend,
    /// Settings backend of the driver's store.
    pub settings: InMemoryBackend,
    /// The driver.
    pub driver: SyncDriver<Arc<MockDeltaSource>>,
}

impl DriverFixture {
    /// Creates a driver tracking [`TRACKED_FOLDER`].
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Creates a driver with a custom configuration.
    pub fn with_config(config: SyncConfig) -> Self {
        let TestStore {
            store,
            archive,
            settings,
        } = TestStore::memory();
        let source = Arc::new(MockDeltaSource::new(TRACKED_FOLDER));
        let driver = SyncDriver::new(config, Arc::clone(&source), store);
        Self {
            source,
            archive,
            settings,
            driver,
        }
    }

    /// Makes archive writes fail, or succeed again.
    pub fn fail_saves(&self, fail: bool) {
        self.archive.set_fail_writes(fail);
    }
}

impl Default for DriverFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A file named `name` in the tracked folder.
pub fn file_item(id: &str, name: &str) -> DeltaItem {
    DeltaItem::file(id, name, TRACKED_FOLDER, FIXED_TIME)
}

/// A folder named `name` in the tracked folder.
pub fn folder_item(id: &str, name: &str) -> DeltaItem {
    DeltaItem::folder(id, name, TRACKED_FOLDER, FIXED_TIME)
}

/// A deletion of `id` from the tracked folder.
pub fn delete_item(id: &str) -> DeltaItem {
    DeltaItem::deleted(id, TRACKED_FOLDER, FIXED_TIME)
}

/// A final delta page.
pub fn page(token: &str, items: Vec<DeltaItem>) -> DeltaPage {
    DeltaPage::new(token, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_reopen_sees_saved_records() {
        let mut store = TestStore::memory();
        store.apply_delta(TRACKED_FOLDER, &[file_item("A", "a.txt")]);
        store.save().unwrap();
        store.set_sync_token(Some("T1")).unwrap();

        let reopened = store.reopen();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.sync_token(), Some("T1"));
    }

    #[test]
    fn temp_data_dir_store() {
        let dir = TempDataDir::new();
        {
            let mut store = dir.open_store();
            store.apply_delta(TRACKED_FOLDER, &[folder_item("G", "G")]);
            store.save().unwrap();
        }
        assert!(dir.open_store().get("G").unwrap().is_folder());
    }

    #[test]
    fn driver_fixture_syncs() {
        let fixture = DriverFixture::new();
        fixture
            .source
            .push_page(page("T1", vec![file_item("A", "a.txt"), delete_item("Z")]));

        let report = fixture.driver.sync().unwrap();
        assert_eq!(report.reconcile.added, 1);
        assert_eq!(report.reconcile.deleted, 0);
        assert!(fixture.archive.write_count() > 0);
    }
}
