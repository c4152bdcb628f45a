//! Error types for protocol parsing.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while parsing API responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The body is not valid JSON, or not the expected JSON shape.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// A required field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A timestamp does not parse as an RFC 3339 UTC time.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
