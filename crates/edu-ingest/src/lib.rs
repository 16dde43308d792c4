//! Source adapters for the edu-stats pipeline.
//!
//! Each adapter pulls one provider's series over HTTP, upserts the rows that
//! fall inside the requested year range, and falls back to a compiled-in
//! table when the remote yields nothing. Adapters are dispatched through
//! [`Source`] and write only through the `edu-core` store traits.

pub mod adapter;
pub mod adapters;
pub mod coerce;
pub mod context;
pub mod curated;
pub mod error;
pub mod fetch;
pub mod workbook;

pub use adapter::{Source, SourceReport, run};
pub use context::{Endpoints, IngestContext};
pub use error::{Error, Result};
