//! Observation families: the measurements the pipeline collects.
//!
//! Each family maps to one table. A row is identified by its natural key
//! (every identifying attribute, `year` and `source` included, but never the
//! measured value); writing the same key twice replaces the value.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Sentinel for demographic/gender/race columns that are not broken down.
pub const ALL: &str = "all";

/// Sentinel `state` for national figures.
pub const NATIONAL: &str = "US";

// ─── Families ────────────────────────────────────────────────────────────────

/// One topical table of observations.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Family {
  Literacy,
  Attainment,
  Graduation,
  Enrollment,
  Proficiency,
  EarlyChildhood,
}

impl Family {
  pub fn table(self) -> &'static str {
    match self {
      Family::Literacy => "literacy_rates",
      Family::Attainment => "educational_attainment",
      Family::Graduation => "graduation_rates",
      Family::Enrollment => "enrollment_rates",
      Family::Proficiency => "test_proficiency",
      Family::EarlyChildhood => "early_childhood",
    }
  }

  pub fn value_column(self) -> &'static str {
    match self {
      Family::Literacy | Family::Graduation => "rate",
      Family::Attainment => "percentage",
      Family::Enrollment => "enrollment_rate",
      Family::Proficiency => "avg_score",
      Family::EarlyChildhood => "metric_value",
    }
  }

  /// Natural-key columns, in the order [`Observation::key`] yields values.
  pub fn key_columns(self) -> &'static [&'static str] {
    match self {
      Family::Literacy => &["year", "age_group", "gender", "source"],
      Family::Attainment => &[
        "year",
        "age_group",
        "education_level",
        "gender",
        "race",
        "source",
      ],
      Family::Graduation => {
        &["year", "cohort_year", "state", "demographics", "source"]
      }
      Family::Enrollment => {
        &["year", "age_group", "level", "state", "demographics", "source"]
      }
      Family::Proficiency => &[
        "year",
        "subject",
        "grade",
        "proficiency_level",
        "state",
        "demographics",
        "source",
      ],
      Family::EarlyChildhood => &[
        "year",
        "cohort_year",
        "metric_name",
        "age_months",
        "demographics",
        "source",
      ],
    }
  }
}

// ─── Key values ──────────────────────────────────────────────────────────────

/// One component of a natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
  Int(i64),
  Text(String),
}

impl From<i32> for KeyValue {
  fn from(v: i32) -> Self { KeyValue::Int(v.into()) }
}

impl From<&String> for KeyValue {
  fn from(v: &String) -> Self { KeyValue::Text(v.clone()) }
}

// ─── Family rows ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteracyRate {
  pub year:      i32,
  pub age_group: String,
  pub gender:    String,
  pub source:    String,
  pub rate:      f64,
}

impl LiteracyRate {
  pub fn new(year: i32, age_group: &str, rate: f64, source: &str) -> Self {
    Self {
      year,
      age_group: age_group.into(),
      gender: ALL.into(),
      source: source.into(),
      rate,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attainment {
  pub year:            i32,
  pub age_group:       String,
  pub education_level: String,
  pub gender:          String,
  pub race:            String,
  pub source:          String,
  pub percentage:      f64,
}

impl Attainment {
  pub fn new(
    year: i32,
    age_group: &str,
    education_level: &str,
    percentage: f64,
    source: &str,
  ) -> Self {
    Self {
      year,
      age_group: age_group.into(),
      education_level: education_level.into(),
      gender: ALL.into(),
      race: ALL.into(),
      source: source.into(),
      percentage,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraduationRate {
  pub year:         i32,
  pub cohort_year:  i32,
  pub state:        String,
  pub demographics: String,
  pub source:       String,
  pub rate:         f64,
}

impl GraduationRate {
  /// A national rate; the entering cohort is the class four years earlier.
  pub fn national(year: i32, rate: f64, source: &str) -> Self {
    Self {
      year,
      cohort_year: year - 4,
      state: NATIONAL.into(),
      demographics: ALL.into(),
      source: source.into(),
      rate,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRate {
  pub year:            i32,
  pub age_group:       String,
  pub level:           String,
  pub state:           String,
  pub demographics:    String,
  pub source:          String,
  pub enrollment_rate: f64,
}

impl EnrollmentRate {
  pub fn national(
    year: i32,
    age_group: &str,
    level: &str,
    enrollment_rate: f64,
    source: &str,
  ) -> Self {
    Self {
      year,
      age_group: age_group.into(),
      level: level.into(),
      state: NATIONAL.into(),
      demographics: ALL.into(),
      source: source.into(),
      enrollment_rate,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
  pub year:              i32,
  pub subject:           String,
  pub grade:             i32,
  pub proficiency_level: String,
  pub state:             String,
  pub demographics:      String,
  pub source:            String,
  pub avg_score:         f64,
}

impl TestScore {
  /// A national average scale score.
  pub fn national_average(
    year: i32,
    subject: &str,
    grade: i32,
    avg_score: f64,
    source: &str,
  ) -> Self {
    Self {
      year,
      subject: subject.into(),
      grade,
      proficiency_level: "average".into(),
      state: NATIONAL.into(),
      demographics: ALL.into(),
      source: source.into(),
      avg_score,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyChildhoodMetric {
  pub year:         i32,
  pub cohort_year:  i32,
  pub metric_name:  String,
  pub age_months:   i32,
  pub demographics: String,
  pub source:       String,
  pub metric_value: f64,
}

impl EarlyChildhoodMetric {
  pub fn new(
    year: i32,
    metric_name: String,
    age_months: i32,
    metric_value: f64,
    source: &str,
  ) -> Self {
    Self {
      year,
      cohort_year: year,
      metric_name,
      age_months,
      demographics: ALL.into(),
      source: source.into(),
      metric_value,
    }
  }
}

// ─── Observation ─────────────────────────────────────────────────────────────

/// A single measurement belonging to one of the six families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Observation {
  Literacy(LiteracyRate),
  Attainment(Attainment),
  Graduation(GraduationRate),
  Enrollment(EnrollmentRate),
  Proficiency(TestScore),
  EarlyChildhood(EarlyChildhoodMetric),
}

impl Observation {
  pub fn family(&self) -> Family {
    match self {
      Observation::Literacy(_) => Family::Literacy,
      Observation::Attainment(_) => Family::Attainment,
      Observation::Graduation(_) => Family::Graduation,
      Observation::Enrollment(_) => Family::Enrollment,
      Observation::Proficiency(_) => Family::Proficiency,
      Observation::EarlyChildhood(_) => Family::EarlyChildhood,
    }
  }

  pub fn year(&self) -> i32 {
    match self {
      Observation::Literacy(o) => o.year,
      Observation::Attainment(o) => o.year,
      Observation::Graduation(o) => o.year,
      Observation::Enrollment(o) => o.year,
      Observation::Proficiency(o) => o.year,
      Observation::EarlyChildhood(o) => o.year,
    }
  }

  pub fn source(&self) -> &str {
    match self {
      Observation::Literacy(o) => &o.source,
      Observation::Attainment(o) => &o.source,
      Observation::Graduation(o) => &o.source,
      Observation::Enrollment(o) => &o.source,
      Observation::Proficiency(o) => &o.source,
      Observation::EarlyChildhood(o) => &o.source,
    }
  }

  pub fn value(&self) -> f64 {
    match self {
      Observation::Literacy(o) => o.rate,
      Observation::Attainment(o) => o.percentage,
      Observation::Graduation(o) => o.rate,
      Observation::Enrollment(o) => o.enrollment_rate,
      Observation::Proficiency(o) => o.avg_score,
      Observation::EarlyChildhood(o) => o.metric_value,
    }
  }

  /// Natural-key values, aligned with [`Family::key_columns`].
  pub fn key(&self) -> Vec<KeyValue> {
    match self {
      Observation::Literacy(o) => vec![
        o.year.into(),
        (&o.age_group).into(),
        (&o.gender).into(),
        (&o.source).into(),
      ],
      Observation::Attainment(o) => vec![
        o.year.into(),
        (&o.age_group).into(),
        (&o.education_level).into(),
        (&o.gender).into(),
        (&o.race).into(),
        (&o.source).into(),
      ],
      Observation::Graduation(o) => vec![
        o.year.into(),
        o.cohort_year.into(),
        (&o.state).into(),
        (&o.demographics).into(),
        (&o.source).into(),
      ],
      Observation::Enrollment(o) => vec![
        o.year.into(),
        (&o.age_group).into(),
        (&o.level).into(),
        (&o.state).into(),
        (&o.demographics).into(),
        (&o.source).into(),
      ],
      Observation::Proficiency(o) => vec![
        o.year.into(),
        (&o.subject).into(),
        o.grade.into(),
        (&o.proficiency_level).into(),
        (&o.state).into(),
        (&o.demographics).into(),
        (&o.source).into(),
      ],
      Observation::EarlyChildhood(o) => vec![
        o.year.into(),
        o.cohort_year.into(),
        (&o.metric_name).into(),
        o.age_months.into(),
        (&o.demographics).into(),
        (&o.source).into(),
      ],
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn key_arity_matches_columns() {
    let samples = [
      Observation::Literacy(LiteracyRate::new(1990, "adult_15plus", 99.0, "s")),
      Observation::Attainment(Attainment::new(1990, "25plus", "bachelors_plus", 21.3, "s")),
      Observation::Graduation(GraduationRate::national(1990, 73.7, "s")),
      Observation::Enrollment(EnrollmentRate::national(
        1990,
        "5-17",
        "elementary_secondary",
        92.5,
        "s",
      )),
      Observation::Proficiency(TestScore::national_average(1992, "reading", 8, 260.0, "s")),
      Observation::EarlyChildhood(EarlyChildhoodMetric::new(
        1998,
        "kindergarten_entry_reading".into(),
        60,
        38.0,
        "s",
      )),
    ];

    for obs in &samples {
      assert_eq!(obs.key().len(), obs.family().key_columns().len(), "{obs:?}");
      assert_eq!(obs.family().key_columns()[0], "year");
      assert_eq!(*obs.family().key_columns().last().unwrap(), "source");
    }
    assert_eq!(samples.len(), Family::iter().count());
  }

  #[test]
  fn graduation_cohort_is_four_years_back() {
    let g = GraduationRate::national(2010, 79.0, "s");
    assert_eq!(g.cohort_year, 2006);
    assert_eq!(g.state, NATIONAL);
  }

  #[test]
  fn family_names_round_trip() {
    for family in Family::iter() {
      let parsed: Family = family.to_string().parse().unwrap();
      assert_eq!(parsed, family);
    }
    assert_eq!(Family::EarlyChildhood.to_string(), "early_childhood");
  }
}
