//! Pipeline runner tests: a scripted executor for resume and failure
//! behaviour, and an offline end-to-end run with the live executor.

use std::{path::PathBuf, sync::Mutex};

use edu_core::{
  YearRange,
  metadata::{PipelineStatus, SourceStatus},
  store::StatsStore,
};
use edu_export::TopicFile;
use edu_ingest::{Endpoints, IngestContext, Source};
use edu_store_sqlite::SqliteStore;
use strum::IntoEnumIterator as _;
use wiremock::MockServer;

use crate::{
  Error,
  cli::AllArgs,
  commands,
  config::Settings,
  pipeline::{Pipeline, Step, StepExecutor, run_single},
  steps::LiveExecutor,
};

const SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../schema.sql"));

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.expect("in-memory store");
  s.apply_schema_sql(SCHEMA.to_owned()).await.expect("schema");
  s
}

fn range(a: i32, b: i32) -> YearRange { YearRange::new(a, b).unwrap() }

// ─── Scripted executor ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("scripted failure in {0}")]
struct Scripted(Step);

#[derive(Default)]
struct Script {
  fail_on: Option<Step>,
  ran:     Mutex<Vec<Step>>,
}

impl Script {
  fn failing(step: Step) -> Self {
    Self {
      fail_on: Some(step),
      ..Default::default()
    }
  }

  fn ran(&self) -> Vec<Step> { self.ran.lock().unwrap().clone() }
}

impl StepExecutor for Script {
  type Error = Scripted;

  async fn execute(&self, step: Step, _range: YearRange, _dry_run: bool) -> Result<(), Scripted> {
    self.ran.lock().unwrap().push(step);
    if self.fail_on == Some(step) {
      return Err(Scripted(step));
    }
    Ok(())
  }
}

#[tokio::test]
async fn fresh_run_executes_every_step_and_logs_them() {
  let s = store().await;
  let script = Script::default();

  let summary = Pipeline::new(&s, &script).run(range(1970, 2025), false).await.unwrap();

  assert_eq!(summary.start_index, 0);
  assert_eq!(script.ran(), Step::sequence());
  let events = s.pipeline_events(100).await.unwrap();
  assert_eq!(events.len(), 14);
  assert_eq!(events[0].step_name, "generate-assets");
  assert_eq!(events[0].status, PipelineStatus::Completed);
  assert_eq!(events[0].years_covered, "1970-2025");
}

#[tokio::test]
async fn failure_is_recorded_and_next_run_resumes_at_the_failed_step() {
  let s = store().await;
  let years = range(1970, 2025);

  let failing = Script::failing(Step::DownloadNces);
  let err = Pipeline::new(&s, &failing).run(years, false).await.unwrap_err();
  assert!(matches!(err, Error::Step { step: Step::DownloadNces, .. }));
  assert_eq!(failing.ran().last(), Some(&Step::DownloadNces));

  let events = s.pipeline_events(1).await.unwrap();
  assert_eq!(events[0].status, PipelineStatus::Failed);
  assert_eq!(events[0].step_name, "download-nces");
  assert_eq!(
    events[0].error_message.as_deref(),
    Some("scripted failure in download-nces")
  );
  assert_eq!(
    s.last_completed_step().await.unwrap().as_deref(),
    Some("download-census")
  );

  let retry = Script::default();
  let summary = Pipeline::new(&s, &retry).run(years, false).await.unwrap();
  assert_eq!(summary.start_index, 3);
  assert_eq!(retry.ran(), vec![
    Step::DownloadNces,
    Step::DownloadNaep,
    Step::DownloadEcls,
    Step::GenerateAssets,
  ]);
}

#[tokio::test]
async fn finished_pipeline_starts_over() {
  let s = store().await;
  let years = range(1970, 2025);
  Pipeline::new(&s, &Script::default()).run(years, false).await.unwrap();

  let again = Script::default();
  let summary = Pipeline::new(&s, &again).run(years, false).await.unwrap();
  assert_eq!(summary.start_index, 0);
  assert_eq!(again.ran().len(), 7);
}

#[tokio::test]
async fn different_range_starts_over() {
  let s = store().await;
  let failing = Script::failing(Step::DownloadNaep);
  assert!(Pipeline::new(&s, &failing).run(range(1970, 2025), false).await.is_err());

  let other = Script::default();
  let summary = Pipeline::new(&s, &other).run(range(1990, 2000), false).await.unwrap();
  assert_eq!(summary.start_index, 0);
  assert_eq!(other.ran().first(), Some(&Step::CheckSchema));
}

#[tokio::test]
async fn dry_run_writes_no_events() {
  let s = store().await;
  let script = Script::default();

  Pipeline::new(&s, &script).run(range(1970, 2025), true).await.unwrap();

  assert_eq!(script.ran().len(), 7);
  assert!(s.pipeline_events(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn single_step_bypasses_the_log() {
  let s = store().await;
  let script = Script::default();

  run_single(&script, Step::DownloadNaep, range(1970, 2025), false)
    .await
    .unwrap();

  assert_eq!(script.ran(), vec![Step::DownloadNaep]);
  assert!(s.pipeline_events(10).await.unwrap().is_empty());

  let failing = Script::failing(Step::GenerateAssets);
  let err = run_single(&failing, Step::GenerateAssets, range(1970, 2025), false)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Step { step: Step::GenerateAssets, .. }));
}

// ─── Live executor, offline ──────────────────────────────────────────────────

struct Offline {
  _server: MockServer,
  dir:     tempfile::TempDir,
  store:   SqliteStore,
  ctx:     IngestContext,
}

impl Offline {
  /// A file-backed store and a mock server with nothing mounted, so every
  /// remote request fails and the curated tables are used. The schema is
  /// applied up front, as `all` does before reading the pipeline log.
  async fn new() -> Self {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("edu_stats.db")).await.unwrap();
    store.apply_schema_sql(SCHEMA.to_owned()).await.unwrap();
    let ctx = IngestContext::new(dir.path().join("downloads"))
      .unwrap()
      .with_endpoints(Endpoints::all_at(&server.uri()));
    Self {
      _server: server,
      dir,
      store,
      ctx,
    }
  }

  fn output_dir(&self) -> PathBuf { self.dir.path().join("site").join("static").join("data") }

  fn executor(&self) -> LiveExecutor<'_> {
    LiveExecutor {
      store:       &self.store,
      ctx:         self.ctx.clone(),
      schema_path: Some(PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../schema.sql"
      ))),
      output_dir:  self.output_dir(),
    }
  }

  fn topic(&self, file: &str) -> TopicFile {
    let text = std::fs::read_to_string(self.output_dir().join(file)).unwrap();
    serde_json::from_str(&text).unwrap()
  }
}

#[tokio::test]
async fn offline_run_exports_curated_series() {
  let env = Offline::new().await;
  let executor = env.executor();

  Pipeline::new(&env.store, &executor)
    .run(range(1970, 2000), false)
    .await
    .unwrap();

  let literacy = env.topic("literacy.json");
  assert_eq!(literacy.data[0].year, 1970);
  assert_eq!(literacy.data[0].value, 98.5);
  assert!(literacy.data.iter().all(|p| (1970..=2000).contains(&p.year)));
  assert!(env.output_dir().join("stats_index.json").is_file());
  assert!(env.output_dir().join("attainment.json").is_file());

  let sources = env.store.source_metadata().await.unwrap();
  let names: Vec<_> = Source::iter().flat_map(|s| s.source_names().iter().copied()).collect();
  assert_eq!(names.len(), 6);
  for name in names {
    let meta = sources
      .iter()
      .find(|m| m.source_name == name)
      .unwrap_or_else(|| panic!("no metadata for {name}"));
    assert_eq!(meta.status, SourceStatus::Success, "{name}");
    assert!(meta.row_count > 0, "{name}");
    assert_eq!(meta.years_available, "1970-2000", "{name}");
  }

  let last = env.store.last_completed_event().await.unwrap().unwrap();
  assert_eq!(last.step_name, "generate-assets");
  assert_eq!(last.years_covered, "1970-2000");
}

#[tokio::test]
async fn offline_run_honours_a_narrow_range() {
  let env = Offline::new().await;
  let executor = env.executor();

  Pipeline::new(&env.store, &executor)
    .run(range(1990, 1995), false)
    .await
    .unwrap();

  let literacy = env.topic("literacy.json");
  assert_eq!(literacy.data.len(), 1);
  assert_eq!(literacy.data[0].year, 1990);
  assert_eq!(literacy.data[0].value, 99.0);
}

#[tokio::test]
async fn offline_run_twice_keeps_row_counts() {
  let env = Offline::new().await;
  let executor = env.executor();
  let years = range(1970, 2025);

  Pipeline::new(&env.store, &executor).run(years, false).await.unwrap();
  let first = env.store.row_counts().await.unwrap();
  Pipeline::new(&env.store, &executor).run(years, false).await.unwrap();
  let second = env.store.row_counts().await.unwrap();

  assert_eq!(first, second);
  assert!(first.values().any(|&n| n > 0));
}

#[tokio::test]
async fn live_dry_run_leaves_output_untouched() {
  let env = Offline::new().await;
  let executor = env.executor();

  Pipeline::new(&env.store, &executor)
    .run(range(1970, 2025), true)
    .await
    .unwrap();

  assert!(!env.output_dir().exists());
  assert!(env.store.pipeline_events(10).await.unwrap().is_empty());
  assert!(env.store.row_counts().await.unwrap().values().all(|&n| n == 0));
}

#[test]
fn malformed_range_is_a_core_error() {
  let err = "1990-19x5".parse::<YearRange>().unwrap_err();
  assert!(matches!(Error::from(err), Error::Core(_)));
  assert!("2000-1990".parse::<YearRange>().is_err());
}

#[tokio::test]
async fn malformed_range_fails_before_touching_the_data_dir() {
  let dir = tempfile::tempdir().unwrap();
  let data_dir = dir.path().join("d");
  let settings = Settings {
    data_dir: Some(data_dir.clone()),
    output_dir: Some(dir.path().join("out")),
    ..Default::default()
  };
  let args = AllArgs {
    years:   "2020-2010".into(),
    dry_run: false,
    step:    None,
  };

  let err = commands::all::run(&settings, &args).await.unwrap_err();

  assert!(matches!(err, Error::Core(_)));
  assert!(err.to_string().contains("2020-2010"));
  assert!(!data_dir.exists());
  assert!(!dir.path().join("out").exists());
}
