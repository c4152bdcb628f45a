//! Delta reconciliation.
//!
//! Applies an ordered batch of [`DeltaItem`]s to a record collection:
//!
//! 1. Every existing record loses its `is_new` mark.
//! 2. Items whose parent is not the tracked folder are skipped; the delta
//!    feed covers the whole drive but only direct children are mirrored.
//! 3. Delete items remove every record with that `file_id`.
//! 4. Other items update the matching record in place, or append a new one.
//!
//! Touched records end the pass with `is_new == true`.

use crate::record::FileRecord;
use drivesync_protocol::DeltaItem;
use thiserror::Error;

/// An item the reconciler refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A create or update item without a name.
    #[error("change record for {file_id} has no file name")]
    MissingFileName {
        /// The offending item's ID.
        file_id: String,
    },
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records appended.
    pub added: usize,
    /// Existing records updated in place.
    pub updated: usize,
    /// Records removed.
    pub deleted: usize,
    /// Items outside the tracked folder.
    pub skipped: usize,
    /// Items that could not be applied.
    pub rejected: Vec<ReconcileError>,
}

impl ReconcileReport {
    /// Number of records added, updated or deleted.
    pub fn changed(&self) -> usize {
        self.added + self.updated + self.deleted
    }
}

/// Applies `items` to `records` for the folder `folder_id`.
pub fn reconcile(
    records: &mut Vec<FileRecord>,
    folder_id: &str,
    items: &[DeltaItem],
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for record in records.iter_mut() {
        record.set_new(false);
    }

    for item in items {
        if !item.is_child_of(folder_id) {
            report.skipped += 1;
            continue;
        }

        tracing::debug!(
            file_id = %item.file_id,
            file_name = ?item.file_name,
            is_folder = item.is_folder,
            is_delete = item.is_delete,
            "applying change record"
        );

        if item.is_delete {
            let before = records.len();
            records.retain(|r| r.file_id() != item.file_id);
            report.deleted += before - records.len();
            continue;
        }

        let Some(file_name) = item.file_name.as_deref() else {
            tracing::warn!(file_id = %item.file_id, "skipping change record without a name");
            report.rejected.push(ReconcileError::MissingFileName {
                file_id: item.file_id.clone(),
            });
            continue;
        };

        let mut found = false;
        for record in records.iter_mut().filter(|r| r.file_id() == item.file_id) {
            record.touch(file_name, &item.last_modified);
            found = true;
        }

        if found {
            report.updated += 1;
        } else {
            records.push(FileRecord::new(
                item.file_id.clone(),
                file_name,
                item.is_folder,
                item.last_modified.clone(),
                true,
            ));
            report.added += 1;
        }
    }

    report
}
