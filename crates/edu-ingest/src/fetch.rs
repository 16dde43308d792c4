//! HTTP fetching and the raw-file download cache.
//!
//! A failed request, a non-2xx status or an unreadable body marks one remote
//! slice as unavailable. Callers log it and move on.

use std::path::{Path, PathBuf};

use edu_core::{
  raw_file::{NewRawFile, compute_hash},
  store::RawFileRegistry,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{IngestContext, Result, error::store_err};

// ─── Slice availability ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Unavailable {
  #[error("request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("HTTP {0}")]
  Status(reqwest::StatusCode),

  #[error("malformed body: {0}")]
  Body(String),
}

/// GET `url` and decode a JSON body.
pub async fn json<T: DeserializeOwned>(
  ctx: &IngestContext,
  url: &str,
) -> Result<T, Unavailable> {
  debug!(%url, "GET");
  let resp = ctx.http.get(url).send().await.map_err(Unavailable::Transport)?;
  if !resp.status().is_success() {
    return Err(Unavailable::Status(resp.status()));
  }
  let bytes = resp.bytes().await.map_err(Unavailable::Transport)?;
  serde_json::from_slice(&bytes).map_err(|e| Unavailable::Body(e.to_string()))
}

// ─── Download cache ──────────────────────────────────────────────────────────

/// A raw file on disk with its registry row.
#[derive(Debug, Clone)]
pub struct CachedFile {
  pub id:     i64,
  pub path:   PathBuf,
  /// Served from the cache without a request.
  pub reused: bool,
}

/// Name a download is stored under: the URL's last path segment, with `.xls`
/// appended unless it already ends in `.xls` or `.xlsx`.
pub fn cache_file_name(url: &str) -> String {
  let path = url.split(['?', '#']).next().unwrap_or(url);
  let base = path
    .rsplit('/')
    .find(|segment| !segment.is_empty())
    .unwrap_or("download");
  let lower = base.to_ascii_lowercase();
  if lower.ends_with(".xls") || lower.ends_with(".xlsx") {
    base.to_owned()
  } else {
    format!("{base}.xls")
  }
}

fn file_type(name: &str) -> String {
  name
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .unwrap_or_else(|| "xls".into())
}

/// Return the cached copy of `url` when the registry row's hash still matches
/// the bytes on disk; otherwise download it, write it under
/// `downloads/`, and record the real content hash.
///
/// `Ok(None)` means the remote was unavailable and no usable copy exists.
pub async fn cached_download<R>(
  ctx: &IngestContext,
  registry: &R,
  source_name: &str,
  url: &str,
) -> Result<Option<CachedFile>>
where
  R: RawFileRegistry,
{
  if let Some(row) = registry.raw_file(source_name, url).await.map_err(store_err)? {
    if row.file_path.is_file() {
      let hash = hash_file(&row.file_path).await?;
      if registry
        .raw_file_exists(source_name, url, &hash)
        .await
        .map_err(store_err)?
      {
        info!(path = %row.file_path.display(), "using cached download");
        return Ok(Some(CachedFile {
          id:     row.id,
          path:   row.file_path,
          reused: true,
        }));
      }
      debug!(path = %row.file_path.display(), "cached file changed on disk; refetching");
    } else {
      debug!(path = %row.file_path.display(), "cached file missing; refetching");
    }
  }

  debug!(%url, "GET");
  let bytes = match ctx.http.get(url).send().await {
    Ok(resp) if resp.status().is_success() => match resp.bytes().await {
      Ok(bytes) => bytes,
      Err(e) => {
        warn!(%url, error = %e, "download body unreadable");
        return Ok(None);
      }
    },
    Ok(resp) => {
      warn!(%url, status = %resp.status(), "download unavailable");
      return Ok(None);
    }
    Err(e) => {
      warn!(%url, error = %e, "download failed");
      return Ok(None);
    }
  };

  tokio::fs::create_dir_all(&ctx.downloads_dir).await?;
  let name = cache_file_name(url);
  let path = ctx.downloads_dir.join(&name);
  tokio::fs::write(&path, &bytes).await?;
  let content_hash = hash_file(&path).await?;

  let id = registry
    .save_raw_file(NewRawFile {
      source_name: source_name.to_owned(),
      file_url: url.to_owned(),
      file_path: path.clone(),
      file_type: file_type(&name),
      file_size: bytes.len() as u64,
      content_hash,
    })
    .await
    .map_err(store_err)?;

  info!(path = %path.display(), bytes = bytes.len(), "downloaded");
  Ok(Some(CachedFile {
    id,
    path,
    reused: false,
  }))
}

/// [`compute_hash`] off the runtime thread.
async fn hash_file(path: &Path) -> std::io::Result<String> {
  let path = path.to_path_buf();
  tokio::task::spawn_blocking(move || compute_hash(&path))
    .await
    .map_err(std::io::Error::other)?
}
