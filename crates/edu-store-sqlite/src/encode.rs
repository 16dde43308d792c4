//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with microsecond precision,
//! which keeps them fixed-width and therefore sortable as text.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use edu_core::{
  metadata::{PipelineEvent, PipelineStatus, SourceMetadata, SourceStatus},
  observation::KeyValue,
  raw_file::RawFile,
  store::SliceValue,
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

fn decode_source_status(s: &str) -> Result<SourceStatus> {
  s.parse().map_err(|_| {
    Error::Core(edu_core::Error::UnknownVariant {
      kind:  "source status",
      value: s.to_owned(),
    })
  })
}

fn decode_pipeline_status(s: &str) -> Result<PipelineStatus> {
  s.parse().map_err(|_| {
    Error::Core(edu_core::Error::UnknownVariant {
      kind:  "pipeline status",
      value: s.to_owned(),
    })
  })
}

// ─── SQL values ──────────────────────────────────────────────────────────────

pub fn key_value(v: KeyValue) -> Value {
  match v {
    KeyValue::Int(i) => Value::Integer(i),
    KeyValue::Text(s) => Value::Text(s),
  }
}

pub fn slice_value(v: &SliceValue) -> Value {
  match v {
    SliceValue::Text(s) => Value::Text((*s).to_owned()),
    SliceValue::Integer(i) => Value::Integer(*i),
  }
}

// ─── Raw row types (used inside tokio-rusqlite closures) ─────────────────────

/// A `source_metadata` row before timestamp and status decoding.
pub struct RawSourceMetadata {
  pub source_name:     String,
  pub last_download:   Option<String>,
  pub years_available: String,
  pub row_count:       i64,
  pub status:          String,
  pub error_message:   Option<String>,
}

impl RawSourceMetadata {
  pub const COLUMNS: &'static str = "source_name, last_download, \
                                     years_available, row_count, status, \
                                     error_message";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      source_name:     row.get(0)?,
      last_download:   row.get(1)?,
      years_available: row.get(2)?,
      row_count:       row.get(3)?,
      status:          row.get(4)?,
      error_message:   row.get(5)?,
    })
  }

  pub fn into_metadata(self) -> Result<SourceMetadata> {
    Ok(SourceMetadata {
      source_name:     self.source_name,
      last_download:   decode_opt_dt(self.last_download)?,
      years_available: self.years_available,
      row_count:       self.row_count.max(0) as u64,
      status:          decode_source_status(&self.status)?,
      error_message:   self.error_message,
    })
  }
}

pub struct RawPipelineEvent {
  pub id:            i64,
  pub step_name:     String,
  pub timestamp:     String,
  pub status:        String,
  pub years_covered: String,
  pub error_message: Option<String>,
}

impl RawPipelineEvent {
  pub const COLUMNS: &'static str =
    "id, step_name, timestamp, status, years_covered, error_message";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      step_name:     row.get(1)?,
      timestamp:     row.get(2)?,
      status:        row.get(3)?,
      years_covered: row.get(4)?,
      error_message: row.get(5)?,
    })
  }

  pub fn into_event(self) -> Result<PipelineEvent> {
    Ok(PipelineEvent {
      id:            self.id,
      step_name:     self.step_name,
      timestamp:     decode_dt(&self.timestamp)?,
      status:        decode_pipeline_status(&self.status)?,
      years_covered: self.years_covered,
      error_message: self.error_message,
    })
  }
}

pub struct RawFileRow {
  pub id:            i64,
  pub source_name:   String,
  pub file_url:      String,
  pub file_path:     String,
  pub file_type:     String,
  pub content_hash:  String,
  pub file_size:     i64,
  pub downloaded_at: String,
  pub parsed:        bool,
  pub parsed_at:     Option<String>,
  pub parse_error:   Option<String>,
}

impl RawFileRow {
  pub const COLUMNS: &'static str = "id, source_name, file_url, file_path, \
                                     file_type, content_hash, file_size, \
                                     downloaded_at, parsed, parsed_at, \
                                     parse_error";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      source_name:   row.get(1)?,
      file_url:      row.get(2)?,
      file_path:     row.get(3)?,
      file_type:     row.get(4)?,
      content_hash:  row.get(5)?,
      file_size:     row.get(6)?,
      downloaded_at: row.get(7)?,
      parsed:        row.get(8)?,
      parsed_at:     row.get(9)?,
      parse_error:   row.get(10)?,
    })
  }

  pub fn into_raw_file(self) -> Result<RawFile> {
    Ok(RawFile {
      id:            self.id,
      source_name:   self.source_name,
      file_url:      self.file_url,
      file_path:     PathBuf::from(self.file_path),
      file_type:     self.file_type,
      content_hash:  self.content_hash,
      file_size:     self.file_size.max(0) as u64,
      downloaded_at: decode_dt(&self.downloaded_at)?,
      parsed:        self.parsed,
      parsed_at:     decode_opt_dt(self.parsed_at)?,
      parse_error:   self.parse_error,
    })
  }
}
