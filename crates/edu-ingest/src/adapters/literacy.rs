//! Literacy rates from the World Bank indicators API.
//!
//! The API publishes no US literacy series, so in practice the curated
//! table is the normal path. An empty remote result is not an error.

use edu_core::{
  Observation, YearRange,
  observation::LiteracyRate,
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

pub const SOURCE: &str = "world_bank_literacy";

pub const ADULT: &str = "adult_15plus";
pub const YOUTH: &str = "youth_15-24";

/// `(indicator code, age group)`.
pub const INDICATORS: &[(&str, &str)] = &[
  ("SE.ADT.LITR.ZS", ADULT),
  ("SE.ADT.1524.LT.ZS", YOUTH),
];

pub fn indicator_url(base: &str, code: &str, range: YearRange) -> String {
  Endpoints::join(
    base,
    &format!(
      "/v2/country/USA/indicator/{code}?date={}:{}&format=json&per_page=1000",
      range.start(),
      range.end()
    ),
  )
}

/// Records of a `[metadata, records]` envelope with a usable year and value.
pub fn parse_envelope(body: &Value, age_group: &str) -> Vec<Observation> {
  let Some(records) = body.get(1).and_then(Value::as_array) else {
    return Vec::new();
  };
  records
    .iter()
    .filter_map(|record| {
      let year = record.get("date").and_then(coerce::year)?;
      let rate = record.get("value").and_then(coerce::number)?;
      Some(Observation::Literacy(LiteracyRate::new(year, age_group, rate, SOURCE)))
    })
    .collect()
}

pub async fn download<S>(ctx: &IngestContext, store: &S, range: YearRange) -> Result<SourceReport>
where
  S: StatsStore,
{
  let mut tally = Tally::default();

  for (code, age_group) in INDICATORS {
    let url = indicator_url(&ctx.endpoints.world_bank, code, range);
    match fetch::json::<Value>(ctx, &url).await {
      Ok(body) => {
        let rows = parse_envelope(&body, age_group);
        tally.remote += write_in_range(store, range, rows).await?;
      }
      Err(e) => {
        warn!(indicator = code, error = %e, "literacy indicator unavailable");
        tally.unavailable += 1;
      }
    }
  }

  if tally.remote == 0 {
    let rows = curated::literacy()
      .map(|(year, rate)| Observation::Literacy(LiteracyRate::new(year, ADULT, rate, SOURCE)))
      .collect();
    tally.fallback = write_in_range(store, range, rows).await?;
  }

  settle(store, SOURCE, range, tally).await
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn url_shape() {
    let url = indicator_url("https://api.worldbank.org", "SE.ADT.LITR.ZS", YearRange::DEFAULT);
    assert_eq!(
      url,
      "https://api.worldbank.org/v2/country/USA/indicator/SE.ADT.LITR.ZS?date=1970:2025&format=json&per_page=1000"
    );
  }

  #[test]
  fn envelope_drops_null_and_zero() {
    let body = json!([
      {"page": 1, "pages": 1, "total": 3},
      [
        {"date": "2020", "value": 99.1},
        {"date": "2019", "value": null},
        {"date": "2018", "value": 0},
        {"date": "2017", "value": "98.7"}
      ]
    ]);
    let rows = parse_envelope(&body, ADULT);
    let years: Vec<_> = rows.iter().map(Observation::year).collect();
    assert_eq!(years, vec![2020, 2017]);
    assert_eq!(rows[1].value(), 98.7);
  }

  #[test]
  fn error_envelope_is_empty() {
    let body = json!([{"message": [{"id": "120", "value": "Invalid value"}]}]);
    assert!(parse_envelope(&body, ADULT).is_empty());
  }
}
