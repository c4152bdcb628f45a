//! Delta records.

use crate::error::ProtocolError;

/// One change record from a delta response.
///
/// A `DeltaItem` describes the creation, update, or deletion of a single
/// remote item. It is consumed by the reconciler and never persisted.
///
/// # Fields
///
/// - `file_id`: stable remote identifier
/// - `file_name`: display name; absent for delete records
/// - `parent_id`: identifier of the containing folder; absent at drive root
/// - `is_folder`: folder vs. file
/// - `is_delete`: the item was removed remotely
/// - `last_modified`: local display time (see [`crate::utc_to_display_time`])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaItem {
    /// Remote item ID.
    pub file_id: String,
    /// Display name.
    pub file_name: Option<String>,
    /// Containing folder ID.
    pub parent_id: Option<String>,
    /// Whether the item is a folder.
    pub is_folder: bool,
    /// Whether the item was deleted.
    pub is_delete: bool,
    /// Last-modified time, already converted for display.
    pub last_modified: String,
}

impl DeltaItem {
    /// Creates a record for a created or updated file.
    pub fn file(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        parent_id: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: Some(file_name.into()),
            parent_id: Some(parent_id.into()),
            is_folder: false,
            is_delete: false,
            last_modified: last_modified.into(),
        }
    }

    /// Creates a record for a created or updated folder.
    pub fn folder(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        parent_id: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            is_folder: true,
            ..Self::file(file_id, file_name, parent_id, last_modified)
        }
    }

    /// Creates a delete record.
    pub fn deleted(
        file_id: impl Into<String>,
        parent_id: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: None,
            parent_id: Some(parent_id.into()),
            is_folder: false,
            is_delete: true,
            last_modified: last_modified.into(),
        }
    }

    /// Returns true if this record is a direct child of `folder_id`.
    pub fn is_child_of(&self, folder_id: &str) -> bool {
        self.parent_id.as_deref() == Some(folder_id)
    }
}

/// A record that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Position of the record in the response's `value` array.
    pub index: usize,
    /// The record's ID, if it could be read.
    pub file_id: Option<String>,
    /// Why the record was rejected.
    pub reason: ProtocolError,
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file_id {
            Some(id) => write!(f, "record {} ({}): {}", self.index, id, self.reason),
            None => write!(f, "record {}: {}", self.index, self.reason),
        }
    }
}

/// One page of a delta response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeltaPage {
    /// Token to present on the next fetch.
    pub next_token: String,
    /// Successfully parsed records, in response order.
    pub items: Vec<DeltaItem>,
    /// Records that failed validation.
    pub rejected: Vec<ItemError>,
    /// Whether the server has more pages for the current change set.
    pub has_more: bool,
}

impl DeltaPage {
    /// Creates a final page with the given token and records.
    pub fn new(next_token: impl Into<String>, items: Vec<DeltaItem>) -> Self {
        Self {
            next_token: next_token.into(),
            items,
            rejected: Vec::new(),
            has_more: false,
        }
    }

    /// Marks the page as followed by further pages.
    pub fn with_more(mut self) -> Self {
        self.has_more = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let file = DeltaItem::file("A", "doc.txt", "F", "2020-01-01 00:00:00");
        assert!(!file.is_folder);
        assert!(!file.is_delete);
        assert_eq!(file.file_name.as_deref(), Some("doc.txt"));

        let folder = DeltaItem::folder("B", "Photos", "F", "2020-01-01 00:00:00");
        assert!(folder.is_folder);
        assert_eq!(folder.file_id, "B");

        let deleted = DeltaItem::deleted("A", "F", "");
        assert!(deleted.is_delete);
        assert!(deleted.file_name.is_none());
    }

    #[test]
    fn parent_matching() {
        let item = DeltaItem::file("A", "doc.txt", "F", "");
        assert!(item.is_child_of("F"));
        assert!(!item.is_child_of("G"));

        let root = DeltaItem {
            parent_id: None,
            ..item
        };
        assert!(!root.is_child_of("F"));
        assert!(!root.is_child_of(""));
    }

    #[test]
    fn item_error_display() {
        let err = ItemError {
            index: 3,
            file_id: Some("A".into()),
            reason: ProtocolError::MissingField("lastModifiedDateTime"),
        };
        assert_eq!(
            err.to_string(),
            "record 3 (A): missing field: lastModifiedDateTime"
        );
    }
}
