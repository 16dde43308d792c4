//! `status`: a read-only report on the store and the remote sources.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use edu_core::{Family, metadata::SourceMetadata, store::StatsStore as _};
use edu_store_sqlite::{DatabaseInfo, SqliteStore};

use crate::{
  Result,
  config::{AppPaths, Settings},
  probe::{self, Probe},
};

#[derive(Debug)]
pub struct StatusReport {
  pub db_path: PathBuf,
  pub now:     DateTime<Utc>,
  /// `None` when the store file does not exist yet.
  pub info:    Option<DatabaseInfo>,
  pub sources: Vec<SourceMetadata>,
  pub counts:  BTreeMap<Family, u64>,
  pub probes:  Vec<Probe>,
}

/// Inspect the store at `paths.db_path` without creating it.
pub async fn gather(paths: &AppPaths, probes: Vec<Probe>) -> Result<StatusReport> {
  let mut report = StatusReport {
    db_path: paths.db_path.clone(),
    now: Utc::now(),
    info: None,
    sources: Vec::new(),
    counts: BTreeMap::new(),
    probes,
  };
  if !paths.db_path.is_file() {
    return Ok(report);
  }

  let store = SqliteStore::open(&paths.db_path).await?;
  let info = store.database_info().await?;
  if info.schema_applied {
    report.sources = store.source_metadata().await?;
    report.counts = store.row_counts().await?;
  }
  report.info = Some(info);
  Ok(report)
}

pub async fn run(settings: &Settings) -> Result<()> {
  let paths = AppPaths::resolve(settings);
  let client = probe::client()?;
  let probes = probe::probe_all(&client, probe::TARGETS).await;
  let report = gather(&paths, probes).await?;
  print!("{report}");
  Ok(())
}

fn human_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
  let mut size = bytes as f64;
  let mut unit = 0;
  while size >= 1024.0 && unit + 1 < UNITS.len() {
    size /= 1024.0;
    unit += 1;
  }
  if unit == 0 {
    format!("{bytes} B")
  } else {
    format!("{size:.1} {}", UNITS[unit])
  }
}

impl fmt::Display for StatusReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Database: {}", self.db_path.display())?;
    let Some(info) = &self.info else {
      writeln!(f, "  not initialized (run `edu-stats init`)")?;
      return self.fmt_probes(f);
    };
    writeln!(f, "  size:   {}", human_size(info.size_bytes))?;
    writeln!(
      f,
      "  schema: {}",
      if info.schema_applied { "applied" } else { "missing" }
    )?;

    writeln!(f, "\nSources:")?;
    if self.sources.is_empty() {
      writeln!(f, "  (none downloaded)")?;
    }
    for source in &self.sources {
      let last = source
        .last_download
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".into());
      let status: &str = source.status.as_ref();
      let stale = if source.is_stale(self.now) { " [stale]" } else { "" };
      writeln!(
        f,
        "  {:<24} {:<8} {:>6} rows  {}{stale}",
        source.source_name, status, source.row_count, last
      )?;
      if let Some(message) = &source.error_message {
        writeln!(f, "    {message}")?;
      }
    }

    if !self.counts.is_empty() {
      writeln!(f, "\nTables:")?;
      for (family, count) in &self.counts {
        writeln!(f, "  {:<28} {count:>6}", family.table())?;
      }
    }

    self.fmt_probes(f)
  }
}

impl StatusReport {
  fn fmt_probes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.probes.is_empty() {
      return Ok(());
    }
    writeln!(f, "\nRemote sources:")?;
    for p in &self.probes {
      let state = if p.reachable { "reachable" } else { "unreachable" };
      writeln!(f, "  {:<12} {state:<12} {}", p.name, p.url)?;
    }
    Ok(())
  }
}
