//! SQLite backend for the edu-stats observation store and raw-file registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod registry;
mod store;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use store::{DatabaseInfo, SqliteStore, DB_FILE_NAME};
