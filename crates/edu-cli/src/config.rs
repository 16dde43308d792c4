//! Settings and on-disk locations.
//!
//! Settings come from an optional TOML file layered under `EDU_STATS_*`
//! environment variables (`EDU_STATS_DATA_DIR`, `EDU_STATS_OUTPUT_DIR`,
//! `EDU_STATS_SCHEMA_PATH`).

use std::path::{Path, PathBuf};

use edu_store_sqlite::DB_FILE_NAME;
use serde::Deserialize;
use tracing::warn;

use crate::Result;

pub const ENV_PREFIX: &str = "EDU_STATS";
pub const APP_DIR_NAME: &str = "edu-stats";

/// Used when no other data directory can be resolved or created.
pub const FALLBACK_DATA_DIR: &str = "data";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub data_dir:    Option<PathBuf>,
  #[serde(default)]
  pub output_dir:  Option<PathBuf>,
  #[serde(default)]
  pub schema_path: Option<PathBuf>,
}

impl Settings {
  /// Layer `file` (if present) and the environment.
  pub fn load(file: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?;
    Ok(settings.try_deserialize()?)
  }
}

// ─── Paths ───────────────────────────────────────────────────────────────────

/// The data directory and what lives in it.
#[derive(Debug, Clone)]
pub struct AppPaths {
  pub data_dir:      PathBuf,
  pub db_path:       PathBuf,
  pub downloads_dir: PathBuf,
}

impl AppPaths {
  pub fn new(data_dir: PathBuf) -> Self {
    Self {
      db_path: data_dir.join(DB_FILE_NAME),
      downloads_dir: data_dir.join("downloads"),
      data_dir,
    }
  }

  /// Resolve from settings and the process environment without touching the
  /// filesystem.
  pub fn resolve(settings: &Settings) -> Self {
    let env_path = |name: &str| {
      std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
    };
    Self::new(resolve_data_dir(
      settings.data_dir.as_deref(),
      env_path("XDG_DATA_HOME").as_deref(),
      env_path("HOME").as_deref(),
    ))
  }

  /// Resolve and create the data directory, falling back to `./data` with a
  /// warning when it cannot be created.
  pub fn prepare(settings: &Settings) -> Self {
    let paths = Self::resolve(settings);
    match create_dir(&paths.data_dir) {
      Ok(()) => paths,
      Err(e) => {
        warn!(
          dir = %paths.data_dir.display(),
          error = %e,
          "could not create data directory; using ./{FALLBACK_DATA_DIR}"
        );
        let fallback = PathBuf::from(FALLBACK_DATA_DIR);
        if let Err(e) = create_dir(&fallback) {
          warn!(error = %e, "could not create ./{FALLBACK_DATA_DIR}");
        }
        Self::new(fallback)
      }
    }
  }
}

/// Configured directory, then `$XDG_DATA_HOME/edu-stats`, then
/// `$HOME/.local/share/edu-stats`, then `./data`.
pub fn resolve_data_dir(
  configured: Option<&Path>,
  xdg_data_home: Option<&Path>,
  home: Option<&Path>,
) -> PathBuf {
  if let Some(dir) = configured {
    return dir.to_path_buf();
  }
  if let Some(xdg) = xdg_data_home {
    return xdg.join(APP_DIR_NAME);
  }
  if let Some(home) = home {
    return home.join(".local").join("share").join(APP_DIR_NAME);
  }
  PathBuf::from(FALLBACK_DATA_DIR)
}

#[cfg(unix)]
fn create_dir(path: &Path) -> std::io::Result<()> {
  use std::os::unix::fs::DirBuilderExt as _;
  std::fs::DirBuilder::new()
    .recursive(true)
    .mode(0o755)
    .create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> std::io::Result<()> { std::fs::create_dir_all(path) }
