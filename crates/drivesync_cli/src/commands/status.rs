//! Status command implementation.

use drivesync_core::{RecordStore, StoreConfig};
use serde::Serialize;
use std::path::Path;

/// Local sync state.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusResult {
    /// Data directory.
    pub path: String,
    /// Committed continuation token, if any.
    pub sync_token: Option<String>,
    /// Tracked records.
    pub records: usize,
    /// Of which folders.
    pub folders: usize,
    /// Records changed by the last sync.
    pub new_records: usize,
}

/// Runs the status command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = RecordStore::open(path, &StoreConfig::default().create_if_missing(false))?;
    let result = summarize(path, &store);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            println!("Data directory: {}", result.path);
            match &result.sync_token {
                Some(token) => println!("Sync token: {}", token),
                None => println!("Sync token: none (next sync is a full sync)"),
            }
            println!("Records: {} ({} folders)", result.records, result.folders);
            println!("Changed by last sync: {}", result.new_records);
        }
    }

    Ok(())
}

fn summarize(path: &Path, store: &RecordStore) -> StatusResult {
    StatusResult {
        path: path.display().to_string(),
        sync_token: store.sync_token().map(str::to_string),
        records: store.len(),
        folders: store.records().iter().filter(|r| r.is_folder()).count(),
        new_records: store.new_records().count(),
    }
}
