//! The record store.

use crate::codec::{decode_records, encode_records};
use crate::config::StoreConfig;
use crate::error::CoreResult;
use crate::reconcile::{reconcile, ReconcileReport};
use crate::record::FileRecord;
use drivesync_protocol::DeltaItem;
use drivesync_storage::{InMemoryBackend, KeyValueStore, StorageBackend};

#[cfg(feature = "std")]
use crate::dir::DataDir;
#[cfg(feature = "std")]
use drivesync_storage::FileBackend;
#[cfg(feature = "std")]
use std::path::Path;

/// The locally persisted snapshot of the tracked folder.
///
/// A `RecordStore` owns:
/// - the in-memory record collection, saved as a whole to the archive slot
/// - the continuation token, kept in a separate settings slot
///
/// Record mutations stay in memory until [`RecordStore::save`]. Token writes
/// go straight to the settings slot.
///
/// # Example
///
/// ```rust
/// use drivesync_core::{DeltaItem, RecordStore};
///
/// let mut store = RecordStore::in_memory();
/// store.apply_delta("F", &[DeltaItem::file("A", "doc.txt", "F", "2020-01-01 00:00:00")]);
/// store.save().unwrap();
/// store.set_sync_token(Some("T1")).unwrap();
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.sync_token(), Some("T1"));
/// ```
pub struct RecordStore {
    records: Vec<FileRecord>,
    archive: Box<dyn StorageBackend>,
    settings: KeyValueStore<Box<dyn StorageBackend>>,
    token_key: String,
    #[cfg(feature = "std")]
    _dir: Option<DataDir>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records.len())
            .field("sync_token", &self.sync_token())
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Opens the store in a data directory, locking it for this process.
    ///
    /// Persisted records are loaded immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened or locked, or the
    /// settings slot cannot be read.
    #[cfg(feature = "std")]
    pub fn open(path: &Path, config: &StoreConfig) -> CoreResult<Self> {
        let dir = DataDir::open(path, config)?;
        let archive = FileBackend::open(&dir.records_path())?;
        let settings = FileBackend::open(&dir.settings_path())?;

        let mut store = Self::with_backends(Box::new(archive), Box::new(settings), config)?;
        store._dir = Some(dir);
        Ok(store)
    }

    /// Opens a store over arbitrary backends and loads persisted records.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings slot cannot be read.
    pub fn with_backends(
        archive: Box<dyn StorageBackend>,
        settings: Box<dyn StorageBackend>,
        config: &StoreConfig,
    ) -> CoreResult<Self> {
        let mut store = Self {
            records: Vec::new(),
            archive,
            settings: KeyValueStore::open(settings)?,
            token_key: config.token_key.clone(),
            #[cfg(feature = "std")]
            _dir: None,
        };
        store.load();
        Ok(store)
    }

    /// Creates an empty store backed by memory.
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            archive: Box::new(InMemoryBackend::new()),
            settings: KeyValueStore::empty(
                Box::new(InMemoryBackend::new()) as Box<dyn StorageBackend>,
            ),
            token_key: StoreConfig::default().token_key,
            #[cfg(feature = "std")]
            _dir: None,
        }
    }

    /// Replaces the in-memory records with the persisted archive.
    ///
    /// A missing archive yields an empty collection. An unreadable archive is
    /// logged and also yields an empty collection; it is never fatal.
    pub fn load(&mut self) {
        self.records = match self.archive.read_all() {
            Ok(Some(bytes)) => decode_records(&bytes).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable record archive");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read record archive");
                Vec::new()
            }
        };
        tracing::debug!(records = self.records.len(), "loaded record store");
    }

    /// Writes the full record collection to the archive, replacing prior content.
    ///
    /// On failure the in-memory records are kept; a later `save` retries with
    /// whatever state is current then.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn save(&mut self) -> CoreResult<()> {
        let bytes = encode_records(&self.records)?;
        self.archive.write_all(&bytes)?;
        tracing::debug!(records = self.records.len(), bytes = bytes.len(), "saved record store");
        Ok(())
    }

    /// Returns the committed continuation token.
    pub fn sync_token(&self) -> Option<&str> {
        self.settings.get(&self.token_key)
    }

    /// Commits a continuation token, or clears it with `None`.
    ///
    /// `Some("")` stores an empty token, which is distinct from clearing.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings slot cannot be written; the previous
    /// token stays readable in that case.
    pub fn set_sync_token(&mut self, token: Option<&str>) -> CoreResult<()> {
        match token {
            Some(token) => self.settings.set(&self.token_key, token)?,
            None => self.settings.remove(&self.token_key)?,
        }
        Ok(())
    }

    /// Drops every record and clears the continuation token.
    ///
    /// The records are not persisted; call [`RecordStore::save`] afterwards
    /// for the reset to survive a restart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be cleared.
    pub fn reset(&mut self) -> CoreResult<()> {
        self.records.clear();
        self.set_sync_token(None)
    }

    /// Applies a batch of change records for the tracked folder `folder_id`.
    pub fn apply_delta(&mut self, folder_id: &str, items: &[DeltaItem]) -> ReconcileReport {
        reconcile(&mut self.records, folder_id, items)
    }

    /// Returns all records in insertion order.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Returns the record with the given ID.
    pub fn get(&self, file_id: &str) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.file_id() == file_id)
    }

    /// Returns the records touched by the most recent pass.
    pub fn new_records(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.is_new())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2020-01-01 00:00:00";

    fn memory_store() -> (RecordStore, InMemoryBackend, InMemoryBackend) {
        let archive = InMemoryBackend::new();
        let settings = InMemoryBackend::new();
        let store = RecordStore::with_backends(
            Box::new(archive.clone()),
            Box::new(settings.clone()),
            &StoreConfig::default(),
        )
        .unwrap();
        (store, archive, settings)
    }

    #[test]
    fn empty_store() {
        let (store, _, _) = memory_store();
        assert!(store.is_empty());
        assert_eq!(store.sync_token(), None);
    }

    #[test]
    fn save_then_load() {
        let (mut store, archive, settings) = memory_store();
        store.apply_delta("F", &[DeltaItem::file("A", "doc.txt", "F", TS)]);
        store.save().unwrap();

        let reopened = RecordStore::with_backends(
            Box::new(archive),
            Box::new(settings),
            &StoreConfig::default(),
        )
        .unwrap();
        assert_eq!(reopened.records(), store.records());
        assert!(reopened.get("A").unwrap().is_new());
    }

    #[test]
    fn load_discards_corrupt_archive() {
        let archive = InMemoryBackend::with_data(b"garbage".to_vec());
        let store = RecordStore::with_backends(
            Box::new(archive),
            Box::new(InMemoryBackend::new()),
            &StoreConfig::default(),
        )
        .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn load_replaces_unsaved_changes() {
        let (mut store, _, _) = memory_store();
        store.apply_delta("F", &[DeltaItem::file("A", "doc.txt", "F", TS)]);
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let (mut store, archive, _) = memory_store();
        store.apply_delta("F", &[DeltaItem::file("A", "doc.txt", "F", TS)]);

        archive.set_fail_writes(true);
        assert!(store.save().is_err());
        assert_eq!(store.len(), 1);
        assert!(archive.data().is_none());

        archive.set_fail_writes(false);
        store.save().unwrap();
        assert!(archive.data().is_some());
    }

    #[test]
    fn token_set_and_clear() {
        let (mut store, _, settings) = memory_store();

        store.set_sync_token(Some("T1")).unwrap();
        assert_eq!(store.sync_token(), Some("T1"));

        store.set_sync_token(Some("")).unwrap();
        assert_eq!(store.sync_token(), Some(""));

        store.set_sync_token(None).unwrap();
        assert_eq!(store.sync_token(), None);

        let persisted = String::from_utf8(settings.data().unwrap()).unwrap();
        assert!(!persisted.contains("syncToken"));
    }

    #[test]
    fn custom_token_key() {
        let settings = InMemoryBackend::new();
        let config = StoreConfig::default().token_key("deltaToken");
        let mut store = RecordStore::with_backends(
            Box::new(InMemoryBackend::new()),
            Box::new(settings.clone()),
            &config,
        )
        .unwrap();
        store.set_sync_token(Some("T9")).unwrap();

        let persisted = String::from_utf8(settings.data().unwrap()).unwrap();
        assert!(persisted.contains("deltaToken"));
    }

    #[test]
    fn reset_is_not_persisted_until_save() {
        let (mut store, archive, settings) = memory_store();
        store.apply_delta("F", &[DeltaItem::file("A", "doc.txt", "F", TS)]);
        store.save().unwrap();
        store.set_sync_token(Some("T1")).unwrap();

        store.reset().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.sync_token(), None);

        let before_save = RecordStore::with_backends(
            Box::new(archive.clone()),
            Box::new(settings.clone()),
            &StoreConfig::default(),
        )
        .unwrap();
        assert_eq!(before_save.len(), 1);

        store.save().unwrap();
        let after_save = RecordStore::with_backends(
            Box::new(archive),
            Box::new(settings),
            &StoreConfig::default(),
        )
        .unwrap();
        assert!(after_save.is_empty());
        assert_eq!(after_save.sync_token(), None);
    }

    #[test]
    fn new_records_iterator() {
        let mut store = RecordStore::in_memory();
        store.apply_delta("F", &[DeltaItem::file("A", "a.txt", "F", TS)]);
        store.apply_delta("F", &[DeltaItem::file("B", "b.txt", "F", TS)]);

        let fresh: Vec<_> = store.new_records().map(FileRecord::file_id).collect();
        assert_eq!(fresh, vec!["B"]);
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();

        {
            let mut store = RecordStore::open(dir.path(), &config).unwrap();
            store.apply_delta("F", &[DeltaItem::folder("B", "Photos", "F", TS)]);
            store.save().unwrap();
            store.set_sync_token(Some("T1")).unwrap();
        }

        let store = RecordStore::open(dir.path(), &config).unwrap();
        assert_eq!(store.sync_token(), Some("T1"));
        assert!(store.get("B").unwrap().is_folder());
        assert!(dir.path().join("fileRecords.archive").exists());
        assert!(dir.path().join("settings.json").exists());
    }

    #[test]
    fn open_twice_is_locked() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::default();

        let _first = RecordStore::open(dir.path(), &config).unwrap();
        assert!(RecordStore::open(dir.path(), &config).is_err());
    }
}
