//! Sync command implementation.

use super::{open_driver, print_summary, Remote, SyncSummary};
use drivesync_engine::{FetchError, SyncEvent};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs the sync command.
pub fn run(
    path: &Path,
    remote: &Remote,
    max_pages: Option<u32>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let driver = Arc::new(open_driver(path, remote, max_pages, true)?);
    let events = driver.subscribe();

    let handle = driver.spawn_sync()?;
    let result = handle.join().map_err(|_| "sync worker panicked")?;

    for event in events.try_iter() {
        if let SyncEvent::StateChanged(state) = event {
            debug!(?state, "sync state changed");
        }
    }

    match result {
        Ok(report) => {
            let summary = SyncSummary::new(&report, driver.records().len());
            print_summary(&summary, format)
        }
        Err(e) => {
            if e.as_fetch().is_some_and(FetchError::is_retryable) {
                eprintln!("The failure looks transient; run sync again later.");
            }
            Err(e.into())
        }
    }
}
