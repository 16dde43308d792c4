//! Kindergarten-entry scores compiled from ECLS cohort reports.
//!
//! ECLS has no practical remote endpoint; the compiled table is the source.

use edu_core::{
  Observation, YearRange,
  observation::EarlyChildhoodMetric,
  store::StatsStore,
};

use crate::{
  Result,
  adapter::{SourceReport, Tally, settle, write_in_range},
  curated::{ECLS_AGE_MONTHS, ECLS_KINDERGARTEN_ENTRY},
};

pub const SOURCE: &str = "ecls_early_childhood";

fn metric(year: i32, name: &str, value: f64) -> Observation {
  Observation::EarlyChildhood(EarlyChildhoodMetric::new(
    year,
    format!("kindergarten_entry_{name}"),
    ECLS_AGE_MONTHS,
    value,
    SOURCE,
  ))
}

pub async fn download<S>(store: &S, range: YearRange) -> Result<SourceReport>
where
  S: StatsStore,
{
  let rows = ECLS_KINDERGARTEN_ENTRY
    .iter()
    .flat_map(|&(year, reading, math)| [metric(year, "reading", reading), metric(year, "math", math)])
    .collect();

  let mut tally = Tally::default();
  tally.fallback = write_in_range(store, range, rows).await?;
  if tally.fallback > 0 {
    tally.note = Some("compiled from published ECLS cohort reports".into());
  }
  settle(store, SOURCE, range, tally).await
}
