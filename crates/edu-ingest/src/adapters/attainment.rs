//! Bachelor's attainment from the Census ACS one-year tables.
//!
//! ACS one-year estimates begin in 2010; earlier years always come from the
//! curated historical table, which is applied alongside the remote rows.

use edu_core::{
  Observation, YearRange,
  observation::Attainment,
  store::StatsStore,
};
use serde_json::Value;
use tracing::warn;

use crate::{
  IngestContext, Result,
  adapter::{SourceReport, Tally, settle, write_in_range},
  coerce,
  context::Endpoints,
  curated,
  fetch,
};

pub const SOURCE: &str = "census_attainment";

pub const AGE_GROUP: &str = "25plus";
pub const LEVEL: &str = "bachelors_plus";

/// Years the one-year ACS endpoint is queried for.
pub const ACS_YEARS: (i32, i32) = (2010, 2023);

pub fn acs_url(base: &str, year: i32) -> String {
  Endpoints::join(
    base,
    &format!("/data/{year}/acs/acs1?get=NAME,B15003_022E,B15003_001E&for=us:*"),
  )
}

/// Bachelor's share of the 25+ population from a `[header, row]` table.
pub fn parse_table(body: &Value) -> Option<f64> {
  let row = body.as_array()?.get(1)?.as_array()?;
  let bachelors = coerce::number(row.get(1)?)?;
  let total = coerce::number(row.get(2)?)?;
  Some(bachelors / total * 100.0)
}

fn row(year: i32, percentage: f64) -> Observation {
  Observation::Attainment(Attainment::new(year, AGE_GROUP, LEVEL, percentage, SOURCE))
}

pub async fn download<S>(ctx: &IngestContext, store: &S, range: YearRange) -> Result<SourceReport>
where
  S: StatsStore,
{
  let mut tally = Tally::default();

  if let Some(acs) = range.clamp(ACS_YEARS.0, ACS_YEARS.1) {
    for year in acs.years() {
      let url = acs_url(&ctx.endpoints.census, year);
      match fetch::json::<Value>(ctx, &url).await {
        Ok(body) => match parse_table(&body) {
          Some(pct) => tally.remote += write_in_range(store, range, vec![row(year, pct)]).await?,
          None => {
            warn!(year, "census table malformed or empty");
            tally.unavailable += 1;
          }
        },
        Err(e) => {
          warn!(year, error = %e, "census year unavailable");
          tally.unavailable += 1;
        }
      }
    }
  }

  let historical = curated::within(curated::ATTAINMENT_HISTORICAL, range)
    .map(|(year, pct)| row(year, pct))
    .collect();
  tally.fallback = write_in_range(store, range, historical).await?;
  if tally.remote > 0 && tally.fallback > 0 {
    tally.note = Some(format!("supplemented with {} historical rows", tally.fallback));
  }

  settle(store, SOURCE, range, tally).await
}
