//! Error type for `edu-cli`.

use thiserror::Error;

use crate::pipeline::Step;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error(transparent)]
  Core(#[from] edu_core::Error),

  #[error("store error: {0}")]
  Store(#[from] edu_store_sqlite::Error),

  #[error("ingest error: {0}")]
  Ingest(#[from] edu_ingest::Error),

  #[error("export error: {0}")]
  Export(#[from] edu_export::Error),

  #[error("http client error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The schema was applied but tables are still missing.
  #[error("schema incomplete; missing tables: {}", .0.join(", "))]
  SchemaIncomplete(Vec<String>),

  #[error("pipeline log error: {0}")]
  Log(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("step {step} failed: {source}")]
  Step {
    step:   Step,
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
