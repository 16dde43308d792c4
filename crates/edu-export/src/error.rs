//! Error type for `edu-export`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("failed to write {path}: {source}")]
  Write {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("failed to create output directory {path}: {source}")]
  CreateDir {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
