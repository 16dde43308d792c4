//! Shared state handed to every adapter.

use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::{Error, Result};

/// Base URLs of the remote services. Overridable so tests can point every
/// adapter at a local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
  pub world_bank: String,
  pub census:     String,
  pub nces:       String,
  pub naep:       String,
}

impl Default for Endpoints {
  fn default() -> Self {
    Self {
      world_bank: "https://api.worldbank.org".into(),
      census:     "https://api.census.gov".into(),
      nces:       "https://nces.ed.gov".into(),
      naep:       "https://www.nationsreportcard.gov".into(),
    }
  }
}

impl Endpoints {
  /// Every service rooted at the same base URL.
  pub fn all_at(base: &str) -> Self {
    let base = base.trim_end_matches('/').to_owned();
    Self {
      world_bank: base.clone(),
      census:     base.clone(),
      nces:       base.clone(),
      naep:       base,
    }
  }

  pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
  }
}

/// HTTP client, download cache location and endpoints.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct IngestContext {
  pub http:          Client,
  pub downloads_dir: PathBuf,
  pub endpoints:     Endpoints,
}

impl IngestContext {
  /// A context with the production endpoints. Data fetches carry no
  /// deadline.
  pub fn new(downloads_dir: impl AsRef<Path>) -> Result<Self> {
    let http = Client::builder()
      .user_agent(concat!("edu-stats/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(Error::Client)?;
    Ok(Self {
      http,
      downloads_dir: downloads_dir.as_ref().to_path_buf(),
      endpoints: Endpoints::default(),
    })
  }

  pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
    self.endpoints = endpoints;
    self
  }
}
