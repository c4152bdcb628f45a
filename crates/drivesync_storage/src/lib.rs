//! # drivesync Storage
//!
//! Durable storage primitives for drivesync.
//!
//! Storage backends are **opaque byte slots**: each backend holds at most one
//! blob, which is replaced as a whole on every write. They do not interpret
//! the data they store; the record archive format lives in `drivesync_core`.
//!
//! ## Design Principles
//!
//! - A write either replaces the previous blob completely or leaves it intact
//! - Backends must be `Send + Sync`
//! - Removing a slot is distinct from writing an empty blob
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing, with write-failure injection
//! - [`FileBackend`] - For persistent storage using write-then-rename
//!
//! [`KeyValueStore`] layers a small string map (the settings slot that holds
//! the continuation token) on top of any backend.
//!
//! ## Example
//!
//! ```rust
//! use drivesync_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.write_all(b"hello world").unwrap();
//! assert_eq!(backend.read_all().unwrap().as_deref(), Some(&b"hello world"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod kv;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use kv::KeyValueStore;
pub use memory::InMemoryBackend;
