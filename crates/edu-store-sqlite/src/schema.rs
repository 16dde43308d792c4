//! Locating and loading `schema.sql`.
//!
//! The schema ships as a plain SQL file next to the workspace root (and is
//! installed to `/usr/share/edu-stats` by packagers). It is idempotent, so it
//! is safe to apply on every `init`, `sync` and pipeline run.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const SCHEMA_FILE_NAME: &str = "schema.sql";

/// System-wide install location, searched last.
pub const SYSTEM_SCHEMA_PATH: &str = "/usr/share/edu-stats/schema.sql";

/// Tables a fully applied schema defines.
pub const EXPECTED_TABLES: &[&str] = &[
  "source_metadata",
  "literacy_rates",
  "educational_attainment",
  "graduation_rates",
  "enrollment_rates",
  "test_proficiency",
  "early_childhood",
  "pipeline_metadata",
  "raw_files",
];

/// Candidate schema paths in search order.
///
/// `explicit` comes first, then the working directory and two levels above
/// it, then the executable's directory and two levels above that, then the
/// system location.
pub fn candidates(
  explicit: Option<&Path>,
  cwd: Option<&Path>,
  exe_dir: Option<&Path>,
) -> Vec<PathBuf> {
  let mut paths = Vec::new();
  if let Some(p) = explicit {
    paths.push(p.to_path_buf());
  }
  for base in [cwd, exe_dir].into_iter().flatten() {
    paths.push(base.join(SCHEMA_FILE_NAME));
    paths.push(base.join("..").join("..").join(SCHEMA_FILE_NAME));
  }
  paths.push(PathBuf::from(SYSTEM_SCHEMA_PATH));
  paths
}

/// First existing candidate, or [`Error::SchemaNotFound`] listing them all.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
  let cwd = std::env::current_dir().ok();
  let exe_dir = std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().map(Path::to_path_buf));

  let searched = candidates(explicit, cwd.as_deref(), exe_dir.as_deref());
  match searched.iter().find(|p| p.is_file()) {
    Some(found) => Ok(found.clone()),
    None => Err(Error::SchemaNotFound { searched }),
  }
}

pub fn load(path: &Path) -> Result<String> {
  std::fs::read_to_string(path).map_err(|source| Error::SchemaRead {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn search_order() {
    let paths = candidates(
      Some(Path::new("/etc/custom.sql")),
      Some(Path::new("/work")),
      Some(Path::new("/opt/bin")),
    );
    assert_eq!(paths, vec![
      PathBuf::from("/etc/custom.sql"),
      PathBuf::from("/work/schema.sql"),
      PathBuf::from("/work/../../schema.sql"),
      PathBuf::from("/opt/bin/schema.sql"),
      PathBuf::from("/opt/bin/../../schema.sql"),
      PathBuf::from(SYSTEM_SCHEMA_PATH),
    ]);
  }

  #[test]
  fn missing_explicit_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope").join("schema.sql");

    // The explicit path leads the list regardless of whether it exists.
    let paths = candidates(Some(&missing), None, None);
    assert_eq!(paths.first(), Some(&missing));
    assert_eq!(paths.last(), Some(&PathBuf::from(SYSTEM_SCHEMA_PATH)));
  }

  #[test]
  fn explicit_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.sql");
    std::fs::write(&path, "-- empty").unwrap();

    assert_eq!(locate(Some(&path)).unwrap(), path);
    assert_eq!(load(&path).unwrap(), "-- empty");
  }

  #[test]
  fn unreadable_schema_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("missing.sql")).unwrap_err();
    assert!(matches!(err, Error::SchemaRead { .. }));
  }
}
