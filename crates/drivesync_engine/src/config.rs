//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Tracked folder ID. Resolved from the delta source when `None`.
    pub folder_id: Option<String>,
    /// Request timeout applied by HTTP clients.
    pub timeout: Duration,
    /// Maximum delta pages fetched in one cycle.
    pub max_pages_per_cycle: u32,
}

impl SyncConfig {
    /// Creates a new sync configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            folder_id: None,
            timeout: Duration::from_secs(30),
            max_pages_per_cycle: 50,
        }
    }

    /// Pins the tracked folder instead of resolving the app folder.
    pub fn with_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page limit per cycle. Values below 1 are raised to 1.
    pub fn with_max_pages_per_cycle(mut self, pages: u32) -> Self {
        self.max_pages_per_cycle = pages.max(1);
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("https://api.onedrive.com/v1.0")
    }
}
