//! The `StatsStore` and `RawFileRegistry` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g. `edu-store-sqlite`).
//! Adapters, the exporter and the CLI depend on this abstraction, not on any
//! concrete backend.

use std::{collections::BTreeMap, future::Future};

use serde::Serialize;

use crate::{
  metadata::{NewPipelineEvent, PipelineEvent, SourceMetadata, SourceUpdate},
  observation::{Family, Observation},
  raw_file::{NewRawFile, RawFile},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// A literal compared against a key column in a [`TopicSlice`].
#[derive(Debug, Clone, PartialEq)]
pub enum SliceValue {
  Text(&'static str),
  Integer(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceFilter {
  /// Must be one of the family's [`Family::key_columns`].
  pub column: &'static str,
  pub value:  SliceValue,
}

/// Selects the rows of one family that make up a single exported series.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSlice {
  pub family:  Family,
  pub filters: Vec<SliceFilter>,
}

impl TopicSlice {
  pub fn new(family: Family) -> Self {
    Self {
      family,
      filters: Vec::new(),
    }
  }

  pub fn text(mut self, column: &'static str, value: &'static str) -> Self {
    self.filters.push(SliceFilter {
      column,
      value: SliceValue::Text(value),
    });
    self
  }

  pub fn integer(mut self, column: &'static str, value: i64) -> Self {
    self.filters.push(SliceFilter {
      column,
      value: SliceValue::Integer(value),
    });
    self
  }
}

/// The mean of a slice's values for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyMean {
  pub year:  i32,
  pub value: f64,
  /// Number of rows averaged.
  pub rows:  u64,
}

// ─── Observation store ───────────────────────────────────────────────────────

/// Abstraction over the observation store backend.
///
/// Observation writes are idempotent upserts keyed on each family's natural
/// key. The pipeline log is append-only.
pub trait StatsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Observations ──────────────────────────────────────────────────────

  /// Insert or replace every observation in a single transaction. Returns the
  /// number of rows written. The `source` of each observation is registered
  /// in `source_metadata` if it is not there yet.
  fn upsert_observations(
    &self,
    rows: Vec<Observation>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Row count per family; every family is present, zero included.
  fn row_counts(
    &self,
  ) -> impl Future<Output = Result<BTreeMap<Family, u64>, Self::Error>> + Send + '_;

  /// Per-year mean of the slice's value column, ascending by year.
  fn yearly_means(
    &self,
    slice: TopicSlice,
  ) -> impl Future<Output = Result<Vec<YearlyMean>, Self::Error>> + Send + '_;

  // ── Sources ───────────────────────────────────────────────────────────

  /// Insert or replace the metadata row for a source, stamping
  /// `last_download` with the current time.
  fn upsert_source_metadata(
    &self,
    update: SourceUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All source metadata rows ordered by name.
  fn source_metadata(
    &self,
  ) -> impl Future<Output = Result<Vec<SourceMetadata>, Self::Error>> + Send + '_;

  // ── Pipeline log ──────────────────────────────────────────────────────

  fn append_pipeline_event(
    &self,
    event: NewPipelineEvent,
  ) -> impl Future<Output = Result<PipelineEvent, Self::Error>> + Send + '_;

  /// The most recent event with status `completed`, if any.
  fn last_completed_event(
    &self,
  ) -> impl Future<Output = Result<Option<PipelineEvent>, Self::Error>> + Send + '_;

  /// The most recent `limit` events, newest first.
  fn pipeline_events(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<PipelineEvent>, Self::Error>> + Send + '_;

  /// Step name of the most recent completed event.
  async fn last_completed_step(&self) -> Result<Option<String>, Self::Error> {
    Ok(self.last_completed_event().await?.map(|e| e.step_name))
  }
}

// ─── Raw file registry ───────────────────────────────────────────────────────

/// Tracks downloaded source files so unchanged content is not fetched twice.
pub trait RawFileRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert or replace the row for `(source_name, file_url)`. Replacing
  /// resets the parse state. Returns the row id.
  fn save_raw_file(
    &self,
    file: NewRawFile,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn raw_file<'a>(
    &'a self,
    source_name: &'a str,
    file_url: &'a str,
  ) -> impl Future<Output = Result<Option<RawFile>, Self::Error>> + Send + 'a;

  /// True when a row exists for `(source_name, file_url)` with exactly this
  /// content hash.
  fn raw_file_exists<'a>(
    &'a self,
    source_name: &'a str,
    file_url: &'a str,
    content_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn mark_parsed(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn mark_parse_error(
    &self,
    id: i64,
    message: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Files for a source that have not been parsed yet, newest first.
  fn unparsed_files<'a>(
    &'a self,
    source_name: &'a str,
  ) -> impl Future<Output = Result<Vec<RawFile>, Self::Error>> + Send + 'a;
}
