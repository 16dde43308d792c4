//! National average scale scores from the NAEP data service.

use edu_core::{
  Observation, YearRange,
  observation::TestScore,
  store::StatsStore,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
  IngestContext, Result,
  adapter::{SourceReport, Tally, settle, write_in_range},
  coerce,
  context::Endpoints,
  curated,
  fetch,
};

pub const SOURCE: &str = "naep_proficiency";

/// `(subject, composite subscale)`.
pub const SUBJECTS: &[(&str, &str)] = &[("reading", "RRPCM"), ("mathematics", "MRPCM")];
pub const GRADES: &[i32] = &[4, 8];

/// Main NAEP national assessment years.
pub const ASSESSMENT_YEARS: &[i32] = &[
  1990, 1992, 1994, 1996, 1998, 2000, 2002, 2003, 2005, 2007, 2009, 2011, 2013,
  2015, 2017, 2019, 2022, 2024,
];

pub fn score_url(base: &str, subject: &str, subscale: &str, grade: i32, year: i32) -> String {
  Endpoints::join(
    base,
    &format!(
      "/Dataservice/GetAdhocData.aspx?type=data&subject={subject}&grade={grade}\
       &subscale={subscale}&variable=TOTAL&jurisdiction=NP&stattype=MN:MN&Year={year}"
    ),
  )
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
  #[serde(default)]
  result: Vec<ScoreRecord>,
}

#[derive(Debug, Deserialize)]
struct ScoreRecord {
  #[serde(default)]
  year:  Value,
  #[serde(default)]
  value: Value,
}

fn parse_scores(body: ScoreResponse, subject: &str, grade: i32) -> Vec<Observation> {
  body
    .result
    .iter()
    .filter_map(|r| {
      let year = coerce::year(&r.year)?;
      let score = coerce::number(&r.value)?;
      Some(Observation::Proficiency(TestScore::national_average(
        year, subject, grade, score, SOURCE,
      )))
    })
    .collect()
}

pub async fn download<S>(ctx: &IngestContext, store: &S, range: YearRange) -> Result<SourceReport>
where
  S: StatsStore,
{
  let mut tally = Tally::default();
  let years: Vec<i32> = ASSESSMENT_YEARS
    .iter()
    .copied()
    .filter(|y| range.contains(*y))
    .collect();

  for (subject, subscale) in SUBJECTS {
    for &grade in GRADES {
      for &year in &years {
        let url = score_url(&ctx.endpoints.naep, subject, subscale, grade, year);
        match fetch::json::<ScoreResponse>(ctx, &url).await {
          Ok(body) => {
            let rows = parse_scores(body, subject, grade);
            tally.remote += write_in_range(store, range, rows).await?;
          }
          Err(e) => {
            debug!(subject, grade, year, error = %e, "NAEP slice unavailable");
            tally.unavailable += 1;
          }
        }
      }
    }
  }
  if tally.unavailable > 0 {
    warn!(unavailable = tally.unavailable, "NAEP data service slices unavailable");
  }

  if tally.remote == 0 {
    let rows = curated::NAEP
      .iter()
      .flat_map(|&(subject, grade, scores)| {
        scores.iter().map(move |&(year, score)| {
          Observation::Proficiency(TestScore::national_average(year, subject, grade, score, SOURCE))
        })
      })
      .collect();
    tally.fallback = write_in_range(store, range, rows).await?;
  }

  settle(store, SOURCE, range, tally).await
}
