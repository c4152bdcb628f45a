//! # drivesync Core
//!
//! Local state for drivesync.
//!
//! This crate provides:
//! - [`FileRecord`], the locally tracked metadata of one remote item
//! - [`RecordStore`], the owned record collection plus continuation token
//! - The delta reconciler ([`reconcile`]) that applies change records
//! - The record archive format and the on-disk data directory layout
//!
//! ## Key Invariants
//!
//! - `file_id` is unique within a store at all times
//! - `is_new` marks exactly the records touched by the most recent pass
//! - Loading never fails on bad archive content; it starts empty instead

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod config;
#[cfg(feature = "std")]
mod dir;
mod error;
mod reconcile;
mod record;
mod store;

pub use config::StoreConfig;
#[cfg(feature = "std")]
pub use dir::DataDir;
pub use error::{CoreError, CoreResult};
pub use reconcile::{reconcile, ReconcileError, ReconcileReport};
pub use record::FileRecord;
pub use store::RecordStore;

pub use drivesync_protocol::DeltaItem;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
