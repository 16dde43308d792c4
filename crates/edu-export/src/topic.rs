//! The six exported topics and the slice of the store each one reads.

use edu_core::{Family, store::TopicSlice};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Topic {
  Literacy,
  Attainment,
  Graduation,
  Enrollment,
  Proficiency,
  EarlyChildhood,
}

impl Topic {
  /// Key in `stats_index.json` and stem of the output file name.
  pub fn slug(self) -> &'static str {
    match self {
      Topic::Literacy => "literacy",
      Topic::Attainment => "attainment",
      Topic::Graduation => "graduation",
      Topic::Enrollment => "enrollment",
      Topic::Proficiency => "proficiency",
      Topic::EarlyChildhood => "early_childhood",
    }
  }

  pub fn file_name(self) -> String { format!("{}.json", self.slug()) }

  /// `name` field of the topic file.
  pub fn name(self) -> &'static str {
    match self {
      Topic::Literacy => "Literacy Rates",
      Topic::Attainment => "Educational Attainment",
      Topic::Graduation => "High School Graduation Rates",
      Topic::Enrollment => "Enrollment Rates",
      Topic::Proficiency => "Test Proficiency",
      Topic::EarlyChildhood => "Early Childhood Metrics",
    }
  }

  /// Display name in `stats_index.json`.
  pub fn index_name(self) -> &'static str {
    match self {
      Topic::Proficiency => "Test Proficiency (NAEP)",
      other => other.name(),
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Topic::Literacy => "Adult literacy rates (15+)",
      Topic::Attainment => "Percentage with bachelor's degree or higher (25+)",
      Topic::Graduation => "Percentage graduating from high school",
      Topic::Enrollment => "School enrollment rates by level",
      Topic::Proficiency => "NAEP Reading scores (Grade 8)",
      Topic::EarlyChildhood => "Early literacy and readiness indicators",
    }
  }

  pub fn source(self) -> &'static str {
    match self {
      Topic::Literacy => "World Bank / UNESCO",
      Topic::Attainment => "US Census Bureau",
      Topic::Graduation | Topic::Enrollment => "NCES",
      Topic::Proficiency => "NAEP",
      Topic::EarlyChildhood => "NCES ECLS",
    }
  }

  /// Rows averaged into this topic's series.
  pub fn slice(self) -> TopicSlice {
    match self {
      Topic::Literacy => TopicSlice::new(Family::Literacy).text("age_group", "adult_15plus"),
      Topic::Attainment => TopicSlice::new(Family::Attainment)
        .text("education_level", "bachelors_plus")
        .text("age_group", "25plus"),
      Topic::Graduation => TopicSlice::new(Family::Graduation).text("state", "US"),
      Topic::Enrollment => TopicSlice::new(Family::Enrollment).text("age_group", "5-17"),
      Topic::Proficiency => TopicSlice::new(Family::Proficiency)
        .text("subject", "reading")
        .integer("grade", 8),
      Topic::EarlyChildhood => TopicSlice::new(Family::EarlyChildhood).integer("age_months", 60),
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn slices_only_use_key_columns() {
    for topic in Topic::iter() {
      let slice = topic.slice();
      let keys = slice.family.key_columns();
      assert!(
        slice.filters.iter().all(|f| keys.contains(&f.column)),
        "{topic} filters outside the natural key"
      );
    }
  }

  #[test]
  fn slugs_match_display() {
    for topic in Topic::iter() {
      assert_eq!(topic.to_string(), topic.slug());
    }
    assert_eq!(Topic::EarlyChildhood.file_name(), "early_childhood.json");
  }
}
