//! Create-file and create-folder commands.

use super::{open_driver, print_summary, Remote, SyncSummary};
use std::path::Path;
use tracing::info;

/// What to create.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// A small text file.
    File,
    /// An empty folder.
    Folder,
}

/// Creates `name` remotely and syncs the result.
pub fn run(
    path: &Path,
    remote: &Remote,
    kind: Kind,
    name: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if name.trim().is_empty() {
        return Err("Name must not be empty".into());
    }

    let driver = open_driver(path, remote, None, true)?;
    info!(?kind, name, "creating remote item");
    let report = match kind {
        Kind::File => driver.create_file(name)?,
        Kind::Folder => driver.create_folder(name)?,
    };

    let summary = SyncSummary::new(&report, driver.records().len());
    print_summary(&summary, format)
}
