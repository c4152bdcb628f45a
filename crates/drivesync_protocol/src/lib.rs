//! # drivesync Protocol
//!
//! Wire types and parsing for the drive delta API.
//!
//! This crate provides:
//! - [`DeltaItem`] and [`DeltaPage`], the parsed form of a delta response
//! - Per-record validation: one malformed record becomes an [`ItemError`]
//!   instead of failing the whole page
//! - UTC to local display-time conversion
//! - Endpoint paths and request bodies for the app-folder API
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod delta;
pub mod endpoints;
mod error;
mod response;
mod time;

pub use delta::{DeltaItem, DeltaPage, ItemError};
pub use endpoints::CreateFolderRequest;
pub use error::{ProtocolError, ProtocolResult};
pub use response::{parse_delta_page, parse_delta_page_in, parse_folder_id};
pub use time::{local_time_from_utc, utc_to_display_time, DISPLAY_TIME_FORMAT};
