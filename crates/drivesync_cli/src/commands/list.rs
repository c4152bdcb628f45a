//! List command implementation.

use drivesync_core::{FileRecord, RecordStore, StoreConfig};
use std::path::Path;

/// Runs the list command.
pub fn run(path: &Path, new_only: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = RecordStore::open(path, &StoreConfig::default().create_if_missing(false))?;
    let records: Vec<&FileRecord> = store
        .records()
        .iter()
        .filter(|r| !new_only || r.is_new())
        .collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            if records.is_empty() {
                println!("No records");
            }
            for record in records {
                println!("{}", render(record));
            }
        }
    }

    Ok(())
}

/// One text line per record: kind, new marker, date, name and ID.
fn render(record: &FileRecord) -> String {
    format!(
        "{} {} {:19}  {}  ({})",
        if record.is_folder() { "d" } else { "-" },
        if record.is_new() { "*" } else { " " },
        record.date_modified(),
        record.file_name(),
        record.file_id()
    )
}
