//! Endpoint paths and request bodies.
//!
//! Paths are relative to the API base URL (e.g. `https://api.onedrive.com/v1.0`).

use crate::error::{ProtocolError, ProtocolResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Body uploaded by the create-file action.
pub const NEW_FILE_CONTENT: &str = "This is a test text file";

/// Path of the app-folder lookup.
pub fn app_folder() -> &'static str {
    "/me/drive/special/approot:/"
}

/// Path of the delta query, resuming from `token` when present.
pub fn delta(token: Option<&str>) -> String {
    match token {
        Some(token) => format!(
            "/me/drive/root/view.delta?token={}",
            urlencoding::encode(token)
        ),
        None => "/me/drive/root/view.delta".to_string(),
    }
}

/// Path that uploads the content of a file named `name` in the app folder.
pub fn file_content(name: &str) -> String {
    format!(
        "/me/drive/special/approot:/{}:/content",
        urlencoding::encode(name)
    )
}

/// Path that creates a folder named `name` in the app folder.
pub fn folder(name: &str) -> String {
    format!("/me/drive/special/approot:/{}", urlencoding::encode(name))
}

/// Body of a create-folder request.
///
/// Name clashes are resolved server-side by renaming the new folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Empty folder facet marking the item as a folder.
    pub folder: BTreeMap<String, String>,
    /// Conflict behaviour.
    #[serde(rename = "@name.conflictBehavior")]
    pub conflict_behavior: String,
}

impl CreateFolderRequest {
    /// Creates a request for a folder named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: BTreeMap::new(),
            conflict_behavior: "rename".into(),
        }
    }

    /// Encodes the request as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ProtocolError::InvalidJson(e.to_string()))
    }
}
