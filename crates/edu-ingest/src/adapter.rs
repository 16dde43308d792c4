//! The closed set of source adapters and the behaviour they share.
//!
//! Every adapter follows the same shape: try each remote slice, upsert what
//! parsed and lies inside the requested range, fall back to the curated
//! table when the remote produced nothing, and record the outcome in
//! `source_metadata`.

use edu_core::{
  Observation, YearRange,
  metadata::{SourceStatus, SourceUpdate},
  store::{RawFileRegistry, StatsStore},
};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{info, warn};

use crate::{
  IngestContext, Result,
  adapters::{attainment, digest, early_childhood, literacy, proficiency},
  error::store_err,
};

// ─── Sources ─────────────────────────────────────────────────────────────────

/// One remote provider and the adapter that ingests it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Source {
  WorldBank,
  Census,
  Nces,
  Naep,
  Ecls,
}

impl Source {
  /// Pipeline step that runs this adapter.
  pub fn step_name(self) -> String { format!("download-{self}") }

  /// `source_metadata` rows this adapter maintains.
  pub fn source_names(self) -> &'static [&'static str] {
    match self {
      Source::WorldBank => &[literacy::SOURCE],
      Source::Census => &[attainment::SOURCE],
      Source::Nces => &[digest::GRADUATION_SOURCE, digest::ENROLLMENT_SOURCE],
      Source::Naep => &[proficiency::SOURCE],
      Source::Ecls => &[early_childhood::SOURCE],
    }
  }

  /// Human-readable description used in log lines.
  pub fn describe(self) -> &'static str {
    match self {
      Source::WorldBank => "World Bank literacy rates",
      Source::Census => "Census educational attainment",
      Source::Nces => "NCES graduation and enrollment",
      Source::Naep => "NAEP test proficiency",
      Source::Ecls => "ECLS early childhood metrics",
    }
  }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Outcome for one `source_metadata` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
  pub source_name:   &'static str,
  pub remote_rows:   usize,
  pub fallback_rows: usize,
  /// Remote slices that were unavailable.
  pub unavailable:   usize,
  pub status:        SourceStatus,
  pub message:       Option<String>,
}

impl SourceReport {
  pub fn rows(&self) -> usize { self.remote_rows + self.fallback_rows }
}

/// Run `source`'s adapter over `range`.
///
/// In a dry run this logs one line and touches neither the network nor the
/// store. On a store or I/O failure each of the source's metadata rows is set
/// to `failed` (best effort) and the error is returned.
pub async fn run<S>(
  source: Source,
  ctx: &IngestContext,
  store: &S,
  range: YearRange,
  dry_run: bool,
) -> Result<Vec<SourceReport>>
where
  S: StatsStore + RawFileRegistry,
{
  if dry_run {
    info!("[dry run] would download {} for {range}", source.describe());
    return Ok(Vec::new());
  }

  info!("downloading {} for {range}", source.describe());
  let result = match source {
    Source::WorldBank => literacy::download(ctx, store, range).await.map(|r| vec![r]),
    Source::Census => attainment::download(ctx, store, range).await.map(|r| vec![r]),
    Source::Nces => digest::download(ctx, store, range).await,
    Source::Naep => proficiency::download(ctx, store, range).await.map(|r| vec![r]),
    Source::Ecls => early_childhood::download(store, range).await.map(|r| vec![r]),
  };

  match result {
    Ok(reports) => Ok(reports),
    Err(e) => {
      for name in source.source_names() {
        let update = SourceUpdate {
          source_name:   (*name).to_owned(),
          years:         range.to_string(),
          row_count:     0,
          status:        SourceStatus::Failed,
          error_message: Some(e.to_string()),
        };
        if let Err(meta_err) = store.upsert_source_metadata(update).await {
          warn!(source = name, error = %meta_err, "could not record failure");
        }
      }
      Err(e)
    }
  }
}

// ─── Shared steps ────────────────────────────────────────────────────────────

/// Upsert the observations whose year lies in `range`; returns rows written.
pub(crate) async fn write_in_range<S>(
  store: &S,
  range: YearRange,
  rows: Vec<Observation>,
) -> Result<usize>
where
  S: StatsStore,
{
  let rows: Vec<_> = rows.into_iter().filter(|o| range.contains(o.year())).collect();
  if rows.is_empty() {
    return Ok(0);
  }
  store.upsert_observations(rows).await.map_err(store_err)
}

/// Tallies for one source before its metadata row is written.
#[derive(Debug, Default)]
pub(crate) struct Tally {
  pub remote:      usize,
  pub fallback:    usize,
  pub unavailable: usize,
  /// Overrides the fallback note in the metadata message.
  pub note:        Option<String>,
}

/// Decide the source status and record it.
///
/// Remote rows mean success. Otherwise curated rows mean success with a note
/// naming the fallback. Neither means `partial`.
pub(crate) async fn settle<S>(
  store: &S,
  source_name: &'static str,
  range: YearRange,
  tally: Tally,
) -> Result<SourceReport>
where
  S: StatsStore,
{
  let (status, message) = if tally.remote > 0 {
    (SourceStatus::Success, tally.note)
  } else if tally.fallback > 0 {
    let note = tally.note.unwrap_or_else(|| {
      format!("remote returned no data; used curated fallback ({} rows)", tally.fallback)
    });
    (SourceStatus::Success, Some(note))
  } else {
    warn!(source = source_name, %range, "no data available for range");
    (SourceStatus::Partial, Some(format!("no data available for {range}")))
  };

  let report = SourceReport {
    source_name,
    remote_rows: tally.remote,
    fallback_rows: tally.fallback,
    unavailable: tally.unavailable,
    status,
    message,
  };

  store
    .upsert_source_metadata(SourceUpdate {
      source_name:   source_name.to_owned(),
      years:         range.to_string(),
      row_count:     report.rows() as u64,
      status:        report.status,
      error_message: report.message.clone(),
    })
    .await
    .map_err(store_err)?;

  info!(
    source = source_name,
    remote = report.remote_rows,
    fallback = report.fallback_rows,
    status = %report.status,
    "source complete"
  );
  Ok(report)
}
