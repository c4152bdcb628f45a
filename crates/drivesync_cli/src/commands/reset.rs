//! Reset command implementation.

use super::{open_driver, Remote};
use std::path::Path;

/// Drops all records and the continuation token.
pub fn run(path: &Path, remote: &Remote) -> Result<(), Box<dyn std::error::Error>> {
    let driver = open_driver(path, remote, None, false)?;
    let records = driver.records().len();
    driver.reset()?;

    println!("✓ Reset {:?}", path);
    println!("  Records removed: {}", records);
    println!("  The next sync starts from scratch.");
    Ok(())
}
