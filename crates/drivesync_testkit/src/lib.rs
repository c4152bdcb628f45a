//! # drivesync Testkit
//!
//! Test utilities for drivesync.
//!
//! This crate provides:
//! - Store fixtures (in-memory with backend handles, temporary directories)
//! - Driver fixtures wired to a scripted [`MockDeltaSource`]
//! - Property-based generators for delta items using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use drivesync_testkit::prelude::*;
//!
//! #[test]
//! fn first_sync() {
//!     let fixture = DriverFixture::new();
//!     fixture.source.push_page(page("T1", vec![file_item("A", "a.txt")]));
//!     fixture.driver.sync().unwrap();
//! }
//! ```
//!
//! [`MockDeltaSource`]: drivesync_engine::MockDeltaSource

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
