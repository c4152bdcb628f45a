//! # drivesync Engine
//!
//! Sync driver for drivesync.
//!
//! This crate provides:
//! - The sync state machine (idle → fetching → reconciling → persisting)
//! - The [`DeltaSource`] collaborator trait and a scripted [`MockDeltaSource`]
//! - [`GraphDeltaSource`], the HTTP delta source over an injected
//!   [`HttpClient`] and [`AccessTokenProvider`]
//! - A [`SyncEvent`] channel for presentation layers
//!
//! ## Architecture
//!
//! One cycle fetches every pending delta page starting at the committed
//! continuation token, reconciles the records against the tracked folder,
//! saves the records, and only then commits the new token.
//!
//! ## Key Invariants
//!
//! - Cycles never interleave; a concurrent request is rejected
//! - A failed fetch leaves records and token untouched
//! - The token is committed only after the records are durable, so a crash
//!   between the two replays the delta (at-least-once delivery)
//! - Nothing is retried automatically

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod events;
mod http;
mod source;
mod state;

pub use config::SyncConfig;
pub use error::{FetchError, FetchResult, SyncError, SyncResult};
pub use events::{EventFeed, SyncEvent};
pub use http::{
    AccessTokenProvider, GraphDeltaSource, HttpClient, HttpMethod, HttpRequest, HttpResponse,
    StaticToken,
};
pub use source::{Created, DeltaSource, MockDeltaSource};
pub use state::{SyncDriver, SyncReport, SyncState, SyncStats};
