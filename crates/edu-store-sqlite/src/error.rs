//! Error type for `edu-store-sqlite`.

use std::path::PathBuf;

use edu_core::Family;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] edu_core::Error),

  #[error("failed to open store at {path}: {source}")]
  Open {
    path:   PathBuf,
    source: tokio_rusqlite::Error,
  },

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("schema.sql not found; searched: {}", join_paths(.searched))]
  SchemaNotFound { searched: Vec<PathBuf> },

  #[error("failed to read schema {path}: {source}")]
  SchemaRead {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A topic slice named a column outside the family's natural key.
  #[error("column {column:?} is not a key column of {family}")]
  UnknownColumn {
    family: Family,
    column: &'static str,
  },
}

fn join_paths(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|p| p.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
