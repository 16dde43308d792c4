//! Exporter tests against an in-memory store.

use edu_core::{
  Observation,
  observation::{LiteracyRate, TestScore},
  store::StatsStore,
};
use edu_store_sqlite::SqliteStore;

use crate::{Topic, TopicFile, export, exporter::build_topic};

const SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../schema.sql"));

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.expect("in-memory store");
  s.apply_schema_sql(SCHEMA.to_owned()).await.expect("schema");
  s
}

fn adult(year: i32, rate: f64, source: &str) -> Observation {
  Observation::Literacy(LiteracyRate::new(year, "adult_15plus", rate, source))
}

#[tokio::test]
async fn series_is_ascending_mean_of_slice() {
  let s = store().await;
  s.upsert_observations(vec![
    adult(1990, 99.0, "a"),
    adult(1970, 98.0, "a"),
    adult(1970, 99.0, "b"),
    Observation::Literacy(LiteracyRate::new(1980, "youth_15-24", 50.0, "a")),
  ])
  .await
  .unwrap();

  let file = build_topic(&s, Topic::Literacy).await.unwrap().unwrap();
  let years: Vec<_> = file.data.iter().map(|p| p.year).collect();
  assert_eq!(years, vec![1970, 1990]);
  assert_eq!(file.data[0].value, 98.5);
  assert_eq!(file.data[0].label.as_deref(), Some("mean of 2 observations"));
  assert!(file.data[1].label.is_none());
  assert_eq!(file.name, "Literacy Rates");
}

#[tokio::test]
async fn proficiency_reads_grade_eight_reading_only() {
  let s = store().await;
  s.upsert_observations(vec![
    Observation::Proficiency(TestScore::national_average(2019, "reading", 8, 263.0, "n")),
    Observation::Proficiency(TestScore::national_average(2019, "reading", 4, 220.0, "n")),
    Observation::Proficiency(TestScore::national_average(2019, "mathematics", 8, 282.0, "n")),
  ])
  .await
  .unwrap();

  let file = build_topic(&s, Topic::Proficiency).await.unwrap().unwrap();
  assert_eq!(file.data.len(), 1);
  assert_eq!(file.data[0].value, 263.0);
}

#[tokio::test]
async fn writes_files_and_skips_empty_topics() {
  let s = store().await;
  s.upsert_observations(vec![adult(1970, 98.5, "a")]).await.unwrap();
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("static").join("data");

  let report = export(&s, &out, false).await.unwrap();

  assert_eq!(report.empty.len(), 5);
  assert!(out.join("literacy.json").is_file());
  assert!(!out.join("attainment.json").exists());

  let text = std::fs::read_to_string(out.join("literacy.json")).unwrap();
  assert!(text.ends_with("}\n"));
  assert!(text.contains("\n  \"name\": \"Literacy Rates\""));
  assert!(!text.contains("label"));
  let file: TopicFile = serde_json::from_str(&text).unwrap();
  assert_eq!(file.data[0].year, 1970);
  assert_eq!(file.data[0].value, 98.5);

  let index: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(out.join("stats_index.json")).unwrap())
      .unwrap();
  assert_eq!(index["proficiency"], "Test Proficiency (NAEP)");
  assert_eq!(index["early_childhood"], "Early Childhood Metrics");
  assert_eq!(index.as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn dry_run_writes_nothing() {
  let s = store().await;
  s.upsert_observations(vec![adult(1970, 98.5, "a")]).await.unwrap();
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("data");

  let report = export(&s, &out, true).await.unwrap();

  assert_eq!(report.written.len(), 2);
  assert!(!out.exists());
}
