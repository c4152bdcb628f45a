//! CLI command implementations.

pub mod create;
pub mod list;
pub mod reset;
pub mod status;
pub mod sync;

use crate::client::ReqwestClient;
use drivesync_core::{RecordStore, StoreConfig};
use drivesync_engine::{GraphDeltaSource, StaticToken, SyncConfig, SyncDriver, SyncReport};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Remote connection settings shared by network commands.
pub struct Remote {
    /// API base URL.
    pub base_url: String,
    /// Bearer token, if one was given.
    pub access_token: Option<String>,
    /// Folder to track instead of the app folder.
    pub folder_id: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

/// Driver type used by the CLI.
pub type Driver = SyncDriver<GraphDeltaSource<ReqwestClient, StaticToken>>;

/// Opens the store at `path` and wires it to the remote API.
///
/// With `require_token` unset a missing token is tolerated, for commands
/// that never reach the network.
pub fn open_driver(
    path: &Path,
    remote: &Remote,
    max_pages: Option<u32>,
    require_token: bool,
) -> Result<Driver, Box<dyn std::error::Error>> {
    let token = match &remote.access_token {
        Some(token) => token.clone(),
        None if require_token => {
            return Err("Access token required (--access-token or DRIVESYNC_ACCESS_TOKEN)".into())
        }
        None => String::new(),
    };

    let mut config = SyncConfig::new(remote.base_url.as_str()).with_timeout(remote.timeout);
    if let Some(folder_id) = &remote.folder_id {
        config = config.with_folder_id(folder_id.as_str());
    }
    if let Some(pages) = max_pages {
        config = config.with_max_pages_per_cycle(pages);
    }

    let store = RecordStore::open(path, &StoreConfig::default())?;
    let client = ReqwestClient::new(config.timeout)?;
    let source = GraphDeltaSource::new(config.base_url.clone(), client, StaticToken::new(token));
    Ok(SyncDriver::new(config, source, store))
}

/// Printable summary of a sync cycle.
#[derive(Debug, Serialize)]
pub struct SyncSummary {
    /// Token the cycle started from.
    pub previous_token: Option<String>,
    /// Token committed by the cycle.
    pub committed_token: String,
    /// Delta pages fetched.
    pub pages: u32,
    /// Items fetched.
    pub fetched: usize,
    /// Records added.
    pub added: usize,
    /// Records updated.
    pub updated: usize,
    /// Records deleted.
    pub deleted: usize,
    /// Items outside the tracked folder.
    pub skipped: usize,
    /// Items that could not be applied.
    pub rejected: Vec<String>,
    /// Whether more pages are waiting on the server.
    pub more_pending: bool,
    /// Records tracked after the cycle.
    pub records: usize,
    /// Cycle duration in milliseconds.
    pub duration_ms: u64,
}

impl SyncSummary {
    /// Builds a summary from a report and the resulting record count.
    pub fn new(report: &SyncReport, records: usize) -> Self {
        let rejected = report
            .malformed
            .iter()
            .map(ToString::to_string)
            .chain(report.reconcile.rejected.iter().map(ToString::to_string))
            .collect();
        Self {
            previous_token: report.previous_token.clone(),
            committed_token: report.committed_token.clone(),
            pages: report.pages,
            fetched: report.fetched,
            added: report.reconcile.added,
            updated: report.reconcile.updated,
            deleted: report.reconcile.deleted,
            skipped: report.reconcile.skipped,
            rejected,
            more_pending: report.more_pending,
            records,
            duration_ms: report.duration.as_millis() as u64,
        }
    }
}

/// Prints a sync summary in the requested format.
pub fn print_summary(
    summary: &SyncSummary,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        _ => {
            println!("✓ Sync completed");
            println!(
                "  Fetched: {} items in {} page(s)",
                summary.fetched, summary.pages
            );
            println!(
                "  Added: {}  Updated: {}  Deleted: {}  Ignored: {}",
                summary.added, summary.updated, summary.deleted, summary.skipped
            );
            println!("  Records: {}", summary.records);
            println!("  Duration: {} ms", summary.duration_ms);
            if !summary.rejected.is_empty() {
                println!("  Rejected:");
                for reason in &summary.rejected {
                    println!("    - {}", reason);
                }
            }
            if summary.more_pending {
                println!("  More changes are pending; run sync again.");
            }
        }
    }
    Ok(())
}
