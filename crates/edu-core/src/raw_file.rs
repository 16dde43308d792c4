//! Downloaded raw files and their content hashes.

use std::{
  fs::File,
  io::{self, BufReader, Read},
  path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One row of the `raw_files` registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFile {
  pub id:            i64,
  pub source_name:   String,
  pub file_url:      String,
  pub file_path:     PathBuf,
  pub file_type:     String,
  /// SHA-256 hex digest of the bytes on disk.
  pub content_hash:  String,
  pub file_size:     u64,
  pub downloaded_at: DateTime<Utc>,
  pub parsed:        bool,
  pub parsed_at:     Option<DateTime<Utc>>,
  pub parse_error:   Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRawFile {
  pub source_name:  String,
  pub file_url:     String,
  pub file_path:    PathBuf,
  pub file_type:    String,
  pub file_size:    u64,
  pub content_hash: String,
}

/// SHA-256 over the full byte stream of `path`, hex encoded.
pub fn compute_hash(path: &Path) -> io::Result<String> {
  let mut reader = BufReader::new(File::open(path)?);
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let count = reader.read(&mut buffer)?;
    if count == 0 {
      break;
    }
    hasher.update(&buffer[..count]);
  }
  Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn hash_of_known_bytes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"abc").unwrap();

    let hash = compute_hash(file.path()).unwrap();
    assert_eq!(
      hash,
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }

  #[test]
  fn hash_of_empty_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert_eq!(
      compute_hash(file.path()).unwrap(),
      "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
  }

  #[test]
  fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(compute_hash(&dir.path().join("nope.xls")).is_err());
  }
}
