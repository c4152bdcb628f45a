//! Record archive format.
//!
//! ```text
//! +--------+---------+--------------------------------------+
//! | "DSRA" | version | CBOR array of FileRecord maps        |
//! | 4 B    | u16 LE  | {file_id, file_name, is_folder,      |
//! |        |         |  date_modified, is_new}              |
//! +--------+---------+--------------------------------------+
//! ```

use crate::error::{CoreError, CoreResult};
use crate::record::FileRecord;
use std::collections::HashSet;

/// Magic bytes at the start of a record archive.
pub const ARCHIVE_MAGIC: [u8; 4] = *b"DSRA";

/// Current archive version.
pub const ARCHIVE_VERSION: u16 = 1;

const HEADER_LEN: usize = 6;

/// Encodes records into an archive.
///
/// # Errors
///
/// Returns an error if CBOR serialization fails.
pub fn encode_records(records: &[FileRecord]) -> CoreResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(HEADER_LEN + records.len() * 64);
    buf.extend_from_slice(&ARCHIVE_MAGIC);
    buf.extend_from_slice(&ARCHIVE_VERSION.to_le_bytes());
    ciborium::into_writer(records, &mut buf).map_err(|e| CoreError::codec(e.to_string()))?;
    Ok(buf)
}

/// Decodes an archive.
///
/// Records repeating an earlier `file_id` are dropped so the result upholds
/// the store's uniqueness invariant.
///
/// # Errors
///
/// Returns an error on bad magic, an unsupported version, or malformed CBOR.
pub fn decode_records(data: &[u8]) -> CoreResult<Vec<FileRecord>> {
    if data.len() < HEADER_LEN || data[0..4] != ARCHIVE_MAGIC {
        return Err(CoreError::invalid_format("invalid archive magic"));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version == 0 || version > ARCHIVE_VERSION {
        return Err(CoreError::invalid_format(format!(
            "unsupported archive version: {version}"
        )));
    }

    let records: Vec<FileRecord> = ciborium::from_reader(&data[HEADER_LEN..])
        .map_err(|e| CoreError::codec(e.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    let total = records.len();
    let unique: Vec<FileRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.file_id().to_string()))
        .collect();
    if unique.len() != total {
        tracing::warn!(dropped = total - unique.len(), "archive held duplicate file ids");
    }

    Ok(unique)
}
