//! Per-topic yearly means written as JSON, plus `stats_index.json`.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use edu_core::store::StatsStore;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;
use tracing::{info, warn};

use crate::{Error, Result, topic::Topic};

pub const INDEX_FILE_NAME: &str = "stats_index.json";

/// One point of an exported series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
  pub year:  i32,
  pub value: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
}

/// Contents of `<topic>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicFile {
  pub name:        String,
  pub description: String,
  pub source:      String,
  pub data:        Vec<DataPoint>,
}

#[derive(Debug, Default)]
pub struct ExportReport {
  pub output_dir: PathBuf,
  /// Files written, or that would be written in a dry run.
  pub written:    Vec<PathBuf>,
  /// Topics with no rows.
  pub empty:      Vec<Topic>,
}

/// Build the series for one topic; `None` when the slice has no rows.
pub async fn build_topic<S>(store: &S, topic: Topic) -> Result<Option<TopicFile>>
where
  S: StatsStore,
{
  let means = store
    .yearly_means(topic.slice())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if means.is_empty() {
    return Ok(None);
  }

  let data = means
    .into_iter()
    .map(|m| DataPoint {
      year:  m.year,
      value: m.value,
      label: (m.rows > 1).then(|| format!("mean of {} observations", m.rows)),
    })
    .collect();

  Ok(Some(TopicFile {
    name: topic.name().into(),
    description: topic.description().into(),
    source: topic.source().into(),
    data,
  }))
}

/// `slug → display name` for every topic.
pub fn stats_index() -> BTreeMap<&'static str, &'static str> {
  Topic::iter().map(|t| (t.slug(), t.index_name())).collect()
}

/// Write every non-empty topic and the index into `output_dir`, creating it
/// if needed. In a dry run the store is read but nothing is written.
pub async fn export<S>(store: &S, output_dir: &Path, dry_run: bool) -> Result<ExportReport>
where
  S: StatsStore,
{
  let mut report = ExportReport {
    output_dir: output_dir.to_path_buf(),
    ..Default::default()
  };

  if !dry_run {
    tokio::fs::create_dir_all(output_dir)
      .await
      .map_err(|source| Error::CreateDir {
        path: output_dir.to_path_buf(),
        source,
      })?;
  }
  info!(dir = %output_dir.display(), "output directory");

  for topic in Topic::iter() {
    let Some(file) = build_topic(store, topic).await? else {
      warn!(topic = %topic, "no data available; skipping");
      report.empty.push(topic);
      continue;
    };

    let path = output_dir.join(topic.file_name());
    if dry_run {
      info!("[dry run] would write {} ({} data points)", path.display(), file.data.len());
    } else {
      write_pretty(&path, &file).await?;
      info!("generated {} ({} data points)", topic.file_name(), file.data.len());
    }
    report.written.push(path);
  }

  let index_path = output_dir.join(INDEX_FILE_NAME);
  if dry_run {
    info!("[dry run] would write {}", index_path.display());
  } else {
    write_pretty(&index_path, &stats_index()).await?;
  }
  report.written.push(index_path);

  Ok(report)
}

/// Two-space indented JSON with a trailing newline.
async fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let mut text = serde_json::to_string_pretty(value)?;
  text.push('\n');
  tokio::fs::write(path, text)
    .await
    .map_err(|source| Error::Write {
      path: path.to_path_buf(),
      source,
    })
}
