//! SQLite backend for the Checkee tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

#[cfg(any(test, feature = "test-util"))]
mod fixtures;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
