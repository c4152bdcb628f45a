//! File records.

use serde::{Deserialize, Serialize};

/// Locally tracked metadata of one remote file or folder.
///
/// `file_id` and `is_folder` are fixed at creation. `file_name`,
/// `date_modified` and `is_new` change as delta records arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    file_id: String,
    file_name: String,
    is_folder: bool,
    date_modified: String,
    is_new: bool,
}

impl FileRecord {
    /// Creates a record.
    pub fn new(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        is_folder: bool,
        date_modified: impl Into<String>,
        is_new: bool,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            is_folder,
            date_modified: date_modified.into(),
            is_new,
        }
    }

    /// Remote item ID.
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Display name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Whether the item is a folder.
    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    /// Last-modified time in local display form.
    pub fn date_modified(&self) -> &str {
        &self.date_modified
    }

    /// Whether the most recent reconciliation pass added or updated this record.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub(crate) fn set_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }

    pub(crate) fn touch(&mut self, file_name: &str, date_modified: &str) {
        file_name.clone_into(&mut self.file_name);
        date_modified.clone_into(&mut self.date_modified);
        self.is_new = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let record = FileRecord::new("A", "doc.txt", false, "2020-01-01 00:00:00", true);
        assert_eq!(record.file_id(), "A");
        assert_eq!(record.file_name(), "doc.txt");
        assert!(!record.is_folder());
        assert_eq!(record.date_modified(), "2020-01-01 00:00:00");
        assert!(record.is_new());
    }

    #[test]
    fn touch_updates_mutable_fields_only() {
        let mut record = FileRecord::new("A", "doc.txt", true, "2020-01-01 00:00:00", false);
        record.touch("renamed.txt", "2020-02-02 12:00:00");

        assert_eq!(record.file_id(), "A");
        assert!(record.is_folder());
        assert_eq!(record.file_name(), "renamed.txt");
        assert_eq!(record.date_modified(), "2020-02-02 12:00:00");
        assert!(record.is_new());
    }
}
