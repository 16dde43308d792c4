//! Graduation and enrollment from the NCES Digest of Education Statistics.
//!
//! Both tables are fetched through the raw-file cache, parsed, and the parse
//! result recorded on the registry row. Each family falls back to its own
//! curated table when parsing produced no rows.

use edu_core::{
  Observation, YearRange,
  observation::{EnrollmentRate, GraduationRate},
  store::{RawFileRegistry, StatsStore},
};
use tracing::{info, warn};

use crate::{
  IngestContext, Result,
  adapter::{SourceReport, Tally, settle, write_in_range},
  context::Endpoints,
  curated,
  error::store_err,
  fetch::{self, CachedFile},
  workbook,
};

pub const GRADUATION_SOURCE: &str = "nces_graduation";
pub const ENROLLMENT_SOURCE: &str = "nces_enrollment";

/// Digest edition the table paths point at.
pub const EDITION: &str = "d22";
pub const GRADUATION_TABLE: &str = "tabn219.46.xls";
pub const ENROLLMENT_TABLE: &str = "tabn103.20.xls";

pub const SCHOOL_AGE: &str = "5-17";
pub const SCHOOL_AGE_LEVEL: &str = "elementary_secondary";
pub const PRESCHOOL_AGE: &str = "3-4";
pub const PRESCHOOL_LEVEL: &str = "preprimary";

pub fn table_url(base: &str, table: &str) -> String {
  Endpoints::join(base, &format!("/programs/digest/{EDITION}/tables/xls/{table}"))
}

pub async fn download<S>(
  ctx: &IngestContext,
  store: &S,
  range: YearRange,
) -> Result<Vec<SourceReport>>
where
  S: StatsStore + RawFileRegistry,
{
  // ── Graduation ──────────────────────────────────────────────────────────
  let url = table_url(&ctx.endpoints.nces, GRADUATION_TABLE);
  let mut graduation = Tally::default();
  let pairs = fetch_and_parse(ctx, store, GRADUATION_SOURCE, &url, range, &mut graduation).await?;
  let rows = pairs
    .into_iter()
    .map(|(year, rate)| graduation_row(year, rate))
    .collect();
  graduation.remote = write_in_range(store, range, rows).await?;

  if graduation.remote == 0 {
    let rows = curated::within(curated::GRADUATION, range)
      .map(|(year, rate)| graduation_row(year, rate))
      .collect();
    graduation.fallback = write_in_range(store, range, rows).await?;
  }
  let graduation = settle(store, GRADUATION_SOURCE, range, graduation).await?;

  // ── Enrollment ──────────────────────────────────────────────────────────
  let url = table_url(&ctx.endpoints.nces, ENROLLMENT_TABLE);
  let mut enrollment = Tally::default();
  let pairs = fetch_and_parse(ctx, store, ENROLLMENT_SOURCE, &url, range, &mut enrollment).await?;
  let rows = pairs
    .into_iter()
    .map(|(year, rate)| enrollment_row(year, SCHOOL_AGE, SCHOOL_AGE_LEVEL, rate))
    .collect();
  enrollment.remote = write_in_range(store, range, rows).await?;

  if enrollment.remote == 0 {
    enrollment.fallback = write_in_range(store, range, curated_enrollment()).await?;
  }
  let enrollment = settle(store, ENROLLMENT_SOURCE, range, enrollment).await?;

  Ok(vec![graduation, enrollment])
}

/// Fetch one table through the cache and parse it, recording the outcome on
/// the registry row. Unavailable downloads and parse failures yield no pairs.
async fn fetch_and_parse<S>(
  ctx: &IngestContext,
  store: &S,
  source_name: &str,
  url: &str,
  range: YearRange,
  tally: &mut Tally,
) -> Result<Vec<(i32, f64)>>
where
  S: RawFileRegistry,
{
  let Some(CachedFile { id, path, .. }) = fetch::cached_download(ctx, store, source_name, url).await?
  else {
    tally.unavailable += 1;
    return Ok(Vec::new());
  };

  match workbook::parse_file(&path, range).await {
    Ok(pairs) => {
      store.mark_parsed(id).await.map_err(store_err)?;
      info!(source = source_name, rows = pairs.len(), "parsed table");
      Ok(pairs)
    }
    Err(e) => {
      warn!(source = source_name, path = %path.display(), error = %e, "could not parse table");
      store.mark_parse_error(id, e.to_string()).await.map_err(store_err)?;
      Ok(Vec::new())
    }
  }
}

fn graduation_row(year: i32, rate: f64) -> Observation {
  Observation::Graduation(GraduationRate::national(year, rate, GRADUATION_SOURCE))
}

fn enrollment_row(year: i32, age_group: &str, level: &str, rate: f64) -> Observation {
  Observation::Enrollment(EnrollmentRate::national(year, age_group, level, rate, ENROLLMENT_SOURCE))
}

fn curated_enrollment() -> Vec<Observation> {
  let historical = curated::ENROLLMENT_SCHOOL_AGE_HISTORICAL
    .iter()
    .map(|&(year, rate)| enrollment_row(year, SCHOOL_AGE, SCHOOL_AGE_LEVEL, rate));
  let recent = curated::ENROLLMENT_RECENT.iter().flat_map(|&(year, preschool, school)| {
    [
      enrollment_row(year, PRESCHOOL_AGE, PRESCHOOL_LEVEL, preschool),
      enrollment_row(year, SCHOOL_AGE, SCHOOL_AGE_LEVEL, school),
    ]
  });
  historical.chain(recent).collect()
}
