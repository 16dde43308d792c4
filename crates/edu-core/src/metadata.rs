//! Source and pipeline bookkeeping records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

// ─── Sources ─────────────────────────────────────────────────────────────────

/// Outcome of the most recent download for a source.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceStatus {
  Success,
  Partial,
  Failed,
  #[default]
  Unknown,
}

/// Downloads older than this are reported as stale by `status`.
pub const STALE_AFTER_DAYS: i64 = 30;

/// One row of `source_metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
  pub source_name:     String,
  pub last_download:   Option<DateTime<Utc>>,
  pub years_available: String,
  pub row_count:       u64,
  pub status:          SourceStatus,
  pub error_message:   Option<String>,
}

impl SourceMetadata {
  pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
    self
      .last_download
      .is_some_and(|at| now - at > Duration::days(STALE_AFTER_DAYS))
  }
}

/// Input to [`StatsStore::upsert_source_metadata`](crate::store::StatsStore::upsert_source_metadata).
/// `last_download` is always set to the current time by the store.
#[derive(Debug, Clone)]
pub struct SourceUpdate {
  pub source_name:   String,
  pub years:         String,
  pub row_count:     u64,
  pub status:        SourceStatus,
  pub error_message: Option<String>,
}

// ─── Pipeline log ────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PipelineStatus {
  Started,
  Completed,
  Failed,
}

/// One row of the append-only `pipeline_metadata` log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
  pub id:            i64,
  pub step_name:     String,
  pub timestamp:     DateTime<Utc>,
  pub status:        PipelineStatus,
  pub years_covered: String,
  pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPipelineEvent {
  pub step_name:     String,
  pub status:        PipelineStatus,
  pub years_covered: String,
  pub error_message: Option<String>,
}

impl NewPipelineEvent {
  pub fn new(step_name: impl Into<String>, status: PipelineStatus, years: impl Into<String>) -> Self {
    Self {
      step_name: step_name.into(),
      status,
      years_covered: years.into(),
      error_message: None,
    }
  }

  pub fn with_error(mut self, message: impl Into<String>) -> Self {
    self.error_message = Some(message.into());
    self
  }
}
