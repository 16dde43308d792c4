//! Error type for `edu-ingest`.
//!
//! Remote unavailability is not an error here: adapters log and skip those
//! slices. What remains aborts the step.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Box a backend error into [`Error::Store`].
pub(crate) fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}
