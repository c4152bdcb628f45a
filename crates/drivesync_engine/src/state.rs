//! Sync driver state machine.

use crate::config::SyncConfig;
use crate::error::{FetchResult, SyncError, SyncResult};
use crate::events::{EventFeed, SyncEvent};
use crate::source::DeltaSource;
use drivesync_core::{FileRecord, ReconcileReport, RecordStore};
use drivesync_protocol::{DeltaItem, ItemError};
use parking_lot::{Mutex, RwLock};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// The current state of the sync driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No cycle is running.
    Idle,
    /// Fetching delta pages.
    Fetching,
    /// Applying fetched items to the records.
    Reconciling,
    /// Saving records and committing the token.
    Persisting,
    /// The last cycle failed. Held until the next cycle starts.
    Failed,
}

impl SyncState {
    /// Returns true while a cycle is running.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Fetching | SyncState::Reconciling | SyncState::Persisting
        )
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Cycles that committed a token.
    pub cycles_completed: u64,
    /// Cycles that ended in an error.
    pub cycles_failed: u64,
    /// Delta pages fetched by completed cycles.
    pub pages_fetched: u64,
    /// Items fetched by completed cycles.
    pub items_fetched: u64,
    /// Records added, updated or deleted by completed cycles.
    pub records_changed: u64,
    /// When the last cycle completed.
    pub last_sync_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Result of a completed sync cycle.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Token the cycle started from.
    pub previous_token: Option<String>,
    /// Token committed at the end of the cycle.
    pub committed_token: String,
    /// Number of delta pages fetched.
    pub pages: u32,
    /// Number of items fetched.
    pub fetched: usize,
    /// What reconciliation did with them.
    pub reconcile: ReconcileReport,
    /// Records the response parser rejected.
    pub malformed: Vec<ItemError>,
    /// Whether the server still had pages when the page limit was hit.
    pub more_pending: bool,
    /// Wall time of the cycle.
    pub duration: Duration,
}

struct FetchedDelta {
    next_token: String,
    items: Vec<DeltaItem>,
    malformed: Vec<ItemError>,
    pages: u32,
    more_pending: bool,
}

/// The sync driver.
///
/// Runs fetch → reconcile → persist cycles against a [`DeltaSource`] and owns
/// the [`RecordStore`]. At most one cycle runs at a time; a request made while
/// one is running fails with [`SyncError::SyncInProgress`].
pub struct SyncDriver<S: DeltaSource> {
    config: SyncConfig,
    source: S,
    store: Mutex<RecordStore>,
    /// Held for the duration of a cycle, create or reset.
    cycle: Mutex<()>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
    folder_id: RwLock<Option<String>>,
    events: EventFeed,
}

impl<S: DeltaSource> SyncDriver<S> {
    /// Creates a driver over `source` and an already loaded `store`.
    pub fn new(config: SyncConfig, source: S, store: RecordStore) -> Self {
        let folder_id = config.folder_id.clone();
        Self {
            config,
            source,
            store: Mutex::new(store),
            cycle: Mutex::new(()),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
            folder_id: RwLock::new(folder_id),
            events: EventFeed::new(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Returns the sync statistics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the delta source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns true while a cycle, create or reset holds the driver.
    pub fn is_busy(&self) -> bool {
        self.cycle.is_locked()
    }

    /// Subscribes to driver events.
    pub fn subscribe(&self) -> Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Returns a snapshot of the records.
    pub fn records(&self) -> Vec<FileRecord> {
        self.store.lock().records().to_vec()
    }

    /// Returns the committed continuation token.
    pub fn sync_token(&self) -> Option<String> {
        self.store.lock().sync_token().map(str::to_string)
    }

    /// Returns the tracked folder ID, if known yet.
    pub fn folder_id(&self) -> Option<String> {
        self.folder_id.read().clone()
    }

    /// Runs `f` with shared access to the store.
    ///
    /// Blocks while a cycle is reconciling or persisting.
    pub fn with_store<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> R {
        f(&self.store.lock())
    }

    /// Performs one sync cycle.
    ///
    /// # Errors
    ///
    /// - [`SyncError::SyncInProgress`] if another cycle is running
    /// - [`SyncError::Fetch`] if the source failed; nothing changed
    /// - [`SyncError::Persistence`] if records could not be saved; the
    ///   previous token is still committed
    pub fn sync(&self) -> SyncResult<SyncReport> {
        let _guard = self.cycle.try_lock().ok_or(SyncError::SyncInProgress)?;
        self.run_cycle()
    }

    /// Creates a text file in the tracked folder, then runs a cycle.
    ///
    /// # Errors
    ///
    /// As [`SyncDriver::sync`]. A failed creation skips the cycle.
    pub fn create_file(&self, name: &str) -> SyncResult<SyncReport> {
        self.create_then_sync(name, |source, name, folder_id| {
            source.create_file(name, folder_id)
        })
    }

    /// Creates a folder in the tracked folder, then runs a cycle.
    ///
    /// # Errors
    ///
    /// As [`SyncDriver::create_file`].
    pub fn create_folder(&self, name: &str) -> SyncResult<SyncReport> {
        self.create_then_sync(name, |source, name, folder_id| {
            source.create_folder(name, folder_id)
        })
    }

    /// Drops all records and the token, and persists the empty store.
    ///
    /// The next cycle starts from scratch.
    ///
    /// # Errors
    ///
    /// [`SyncError::SyncInProgress`] if a cycle is running,
    /// [`SyncError::Core`] if the token cannot be cleared and
    /// [`SyncError::Persistence`] if the empty archive cannot be written.
    pub fn reset(&self) -> SyncResult<()> {
        let _guard = self.cycle.try_lock().ok_or(SyncError::SyncInProgress)?;
        {
            let mut store = self.store.lock();
            store.reset()?;
            store.save().map_err(SyncError::Persistence)?;
        }
        tracing::info!("record store reset");
        self.events.emit(SyncEvent::StoreReset);
        Ok(())
    }

    fn create_then_sync(
        &self,
        name: &str,
        create: impl FnOnce(&S, &str, &str) -> FetchResult<()>,
    ) -> SyncResult<SyncReport> {
        let _guard = self.cycle.try_lock().ok_or(SyncError::SyncInProgress)?;

        let created = self
            .resolve_folder_id()
            .and_then(|folder_id| create(&self.source, name, &folder_id));
        if let Err(e) = created {
            tracing::warn!(name, error = %e, "remote create failed");
            self.stats.write().last_error = Some(e.to_string());
            self.events.emit(SyncEvent::CreateFailed(e.to_string()));
            return Err(e.into());
        }

        tracing::info!(name, "created remote item");
        self.run_cycle()
    }

    fn run_cycle(&self) -> SyncResult<SyncReport> {
        let start = Instant::now();
        self.set_state(SyncState::Fetching);

        let previous_token = self.sync_token();
        let outcome = self.resolve_folder_id().and_then(|folder_id| {
            let fetched = self.fetch_all(previous_token.as_deref())?;
            Ok((folder_id, fetched))
        });
        let (folder_id, fetched) = match outcome {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.set_state(SyncState::Reconciling);
        let mut store = self.store.lock();
        let reconcile = store.apply_delta(&folder_id, &fetched.items);

        self.set_state(SyncState::Persisting);
        if let Err(e) = store.save() {
            drop(store);
            return Err(self.fail(SyncError::Persistence(e)));
        }
        if let Err(e) = store.set_sync_token(Some(&fetched.next_token)) {
            drop(store);
            return Err(self.fail(SyncError::Persistence(e)));
        }
        drop(store);

        let report = SyncReport {
            previous_token,
            committed_token: fetched.next_token,
            pages: fetched.pages,
            fetched: fetched.items.len(),
            reconcile,
            malformed: fetched.malformed,
            more_pending: fetched.more_pending,
            duration: start.elapsed(),
        };

        {
            let mut stats = self.stats.write();
            stats.cycles_completed += 1;
            stats.pages_fetched += u64::from(report.pages);
            stats.items_fetched += report.fetched as u64;
            stats.records_changed += report.reconcile.changed() as u64;
            stats.last_sync_time = Some(Instant::now());
            stats.last_error = None;
        }

        tracing::info!(
            pages = report.pages,
            fetched = report.fetched,
            added = report.reconcile.added,
            updated = report.reconcile.updated,
            deleted = report.reconcile.deleted,
            rejected = report.reconcile.rejected.len() + report.malformed.len(),
            duration_ms = report.duration.as_millis() as u64,
            "sync cycle completed"
        );

        self.set_state(SyncState::Idle);
        self.events.emit(SyncEvent::CycleCompleted(report.clone()));
        Ok(report)
    }

    /// Fetches pages until the server reports no more or the page limit is hit.
    fn fetch_all(&self, token: Option<&str>) -> FetchResult<FetchedDelta> {
        let mut token = token.map(str::to_string);
        let mut fetched = FetchedDelta {
            next_token: String::new(),
            items: Vec::new(),
            malformed: Vec::new(),
            pages: 0,
            more_pending: false,
        };

        loop {
            let page = self.source.fetch_delta(token.as_deref())?;
            fetched.pages += 1;
            fetched.items.extend(page.items);
            fetched.malformed.extend(page.rejected);
            fetched.next_token = page.next_token.clone();
            token = Some(page.next_token);

            if !page.has_more {
                break;
            }
            if fetched.pages >= self.config.max_pages_per_cycle {
                tracing::info!(
                    pages = fetched.pages,
                    "page limit reached, remaining changes deferred to the next cycle"
                );
                fetched.more_pending = true;
                break;
            }
        }

        Ok(fetched)
    }

    fn resolve_folder_id(&self) -> FetchResult<String> {
        if let Some(id) = self.folder_id.read().clone() {
            return Ok(id);
        }
        let id = self.source.app_folder_id()?;
        tracing::debug!(folder_id = %id, "resolved app folder");
        *self.folder_id.write() = Some(id.clone());
        Ok(id)
    }

    fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
        self.events.emit(SyncEvent::StateChanged(state));
    }

    /// Records a failed cycle and passes the error through.
    fn fail(&self, error: SyncError) -> SyncError {
        tracing::warn!(error = %error, "sync cycle failed");
        {
            let mut stats = self.stats.write();
            stats.cycles_failed += 1;
            stats.last_error = Some(error.to_string());
        }
        self.set_state(SyncState::Failed);
        self.events.emit(SyncEvent::CycleFailed(error.to_string()));
        error
    }
}

impl<S: DeltaSource + 'static> SyncDriver<S> {
    /// Runs [`SyncDriver::sync`] on a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn_sync(self: &Arc<Self>) -> std::io::Result<JoinHandle<SyncResult<SyncReport>>> {
        let driver = Arc::clone(self);
        std::thread::Builder::new()
            .name("drivesync-cycle".into())
            .spawn(move || driver.sync())
    }
}

impl<S: DeltaSource> std::fmt::Debug for SyncDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncDriver")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("folder_id", &self.folder_id())
            .finish_non_exhaustive()
    }
}
