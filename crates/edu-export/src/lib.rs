//! Projects stored observations into per-topic time-series JSON files for the
//! static site.

pub mod error;
pub mod exporter;
pub mod output;
pub mod topic;

pub use error::{Error, Result};
pub use exporter::{DataPoint, ExportReport, TopicFile, export};
pub use topic::Topic;

#[cfg(test)]
mod tests;
