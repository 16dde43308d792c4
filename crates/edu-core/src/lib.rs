//! Core types and trait definitions for the educational statistics store.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! ingestion, export and CLI crates depend on it and on the [`store`] traits,
//! never on a concrete backend.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod metadata;
pub mod observation;
pub mod raw_file;
pub mod store;
pub mod years;

pub use error::{Error, Result};
pub use observation::{Family, Observation};
pub use years::YearRange;
