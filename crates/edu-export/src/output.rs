//! Choosing where the topic files go.

use std::path::{Path, PathBuf};

/// Data directory relative to a Hugo site checkout.
const SITE_DATA: [&str; 4] = ["hugo", "site", "static", "data"];

/// Candidate output directories, in search order.
pub fn candidates(home: Option<&Path>) -> Vec<PathBuf> {
  let under = |prefix: PathBuf| SITE_DATA.iter().fold(prefix, |p, part| p.join(part));

  let mut dirs = vec![
    under(PathBuf::new()),
    under(PathBuf::from("..").join("..")),
    under(PathBuf::from("..").join("..").join("..")),
  ];
  if let Some(home) = home {
    dirs.push(under(home.join("src").join("proficiency-comparison")));
  }
  dirs
}

/// A candidate counts when the site root two levels up holds a Hugo config.
pub fn is_site_data_dir(dir: &Path) -> bool {
  let Some(site) = dir.parent().and_then(Path::parent) else {
    return false;
  };
  ["config.toml", "hugo.toml"]
    .iter()
    .any(|name| site.join(name).is_file())
}

/// The configured directory when given; otherwise the first candidate that
/// sits inside a Hugo site, falling back to the first candidate.
pub fn resolve(explicit: Option<&Path>, candidates: &[PathBuf]) -> PathBuf {
  if let Some(dir) = explicit {
    return dir.to_path_buf();
  }
  candidates
    .iter()
    .find(|dir| is_site_data_dir(dir))
    .or_else(|| candidates.first())
    .cloned()
    .unwrap_or_else(|| SITE_DATA.iter().collect())
}
