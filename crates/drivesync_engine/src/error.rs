//! Error types for the sync engine.

use drivesync_core::CoreError;
use drivesync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for delta-source calls.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors reported by a delta source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server reported 404.
    #[error("resource not found")]
    ResourceNotFound,

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network or transport failure, including timeouts.
    #[error("transport error: {0}")]
    Transport(String),

    /// Any other non-success status.
    #[error("unexpected response status {status}")]
    UnspecifiedStatus {
        /// HTTP status code.
        status: u16,
    },

    /// No access token could be obtained.
    #[error("authentication failed: {0}")]
    Authentication(String),
}

impl FetchError {
    /// Returns true if repeating the same request later may succeed.
    ///
    /// The driver never retries on its own; callers use this to word their
    /// report.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::UnspecifiedStatus { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<ProtocolError> for FetchError {
    fn from(err: ProtocolError) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The delta source failed; nothing was changed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Records were reconciled in memory but could not be persisted; the
    /// previous continuation token is still committed.
    #[error("persistence failed: {0}")]
    Persistence(#[source] CoreError),

    /// Another cycle is running on this driver.
    #[error("a sync cycle is already in progress")]
    SyncInProgress,

    /// The record store failed outside of a cycle.
    #[error("store error: {0}")]
    Core(#[from] CoreError),
}

impl SyncError {
    /// Returns the underlying fetch error, if any.
    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            SyncError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}
