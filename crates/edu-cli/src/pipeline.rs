//! The ordered, resumable pipeline runner.
//!
//! Every step is recorded in the append-only pipeline log as `started`, then
//! `completed` or `failed`. A new run resumes after the most recent completed
//! step when it was recorded for the same year range; a finished pipeline or
//! a different range starts over from the first step. Resuming a run recorded
//! for another range would skip steps and leave rows outside the requested
//! range untouched, so every step is re-run instead. Steps are idempotent, so
//! re-running a step interrupted mid-way is safe.

use std::time::{Duration, Instant};

use edu_core::{
  YearRange,
  metadata::{NewPipelineEvent, PipelineStatus},
  store::StatsStore,
};
use edu_ingest::Source;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};
use tracing::{error, info};

use crate::{Error, Result};

// ─── Steps ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
  CheckSchema,
  DownloadWorldbank,
  DownloadCensus,
  DownloadNces,
  DownloadNaep,
  DownloadEcls,
  GenerateAssets,
}

impl Step {
  /// Name recorded in the pipeline log.
  pub fn name(self) -> &'static str { self.into() }

  /// Every step in execution order.
  pub fn sequence() -> Vec<Step> { Step::iter().collect() }

  /// The adapter a download step runs.
  pub fn source(self) -> Option<Source> {
    match self {
      Step::DownloadWorldbank => Some(Source::WorldBank),
      Step::DownloadCensus => Some(Source::Census),
      Step::DownloadNces => Some(Source::Nces),
      Step::DownloadNaep => Some(Source::Naep),
      Step::DownloadEcls => Some(Source::Ecls),
      Step::CheckSchema | Step::GenerateAssets => None,
    }
  }
}

// ─── Executor ────────────────────────────────────────────────────────────────

/// Runs a single step. The production implementation lives in
/// [`crate::steps`]; tests substitute their own.
pub trait StepExecutor {
  type Error: std::error::Error + Send + Sync + 'static;

  async fn execute(&self, step: Step, range: YearRange, dry_run: bool) -> Result<(), Self::Error>;
}

// ─── Runner ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RunSummary {
  /// Index into the sequence the run started from.
  pub start_index: usize,
  pub executed:    Vec<(Step, Duration)>,
}

pub struct Pipeline<'a, L, X> {
  log:      &'a L,
  executor: &'a X,
  steps:    Vec<Step>,
}

impl<'a, L, X> Pipeline<'a, L, X>
where
  L: StatsStore,
  X: StepExecutor,
{
  pub fn new(log: &'a L, executor: &'a X) -> Self {
    Self {
      log,
      executor,
      steps: Step::sequence(),
    }
  }

  pub fn steps(&self) -> &[Step] { &self.steps }

  /// Index of the first step to run for `range`.
  pub async fn resume_index(&self, range: YearRange) -> Result<usize> {
    let Some(last) = self
      .log
      .last_completed_event()
      .await
      .map_err(|e| Error::Log(Box::new(e)))?
    else {
      return Ok(0);
    };

    let years = range.to_string();
    if last.years_covered != years {
      info!(
        previous = %last.years_covered,
        requested = %years,
        "year range changed; starting from the first step"
      );
      return Ok(0);
    }

    match self.steps.iter().position(|s| s.name() == last.step_name) {
      Some(k) if k + 1 < self.steps.len() => {
        info!(after = %last.step_name, "resuming");
        Ok(k + 1)
      }
      _ => Ok(0),
    }
  }

  /// Run from the resume point to the end. Stops at the first failure, which
  /// is recorded and returned. A dry run records nothing.
  pub async fn run(&self, range: YearRange, dry_run: bool) -> Result<RunSummary> {
    let start_index = self.resume_index(range).await?;
    let mut summary = RunSummary {
      start_index,
      ..Default::default()
    };
    let years = range.to_string();

    for &step in &self.steps[start_index..] {
      info!(%step, "starting");
      self.record(step, PipelineStatus::Started, &years, None, dry_run).await?;

      let started = Instant::now();
      match self.executor.execute(step, range, dry_run).await {
        Ok(()) => {
          let elapsed = started.elapsed();
          self.record(step, PipelineStatus::Completed, &years, None, dry_run).await?;
          info!(%step, elapsed = ?elapsed, "completed");
          summary.executed.push((step, elapsed));
        }
        Err(e) => {
          let message = e.to_string();
          error!(%step, error = %message, "failed");
          self
            .record(step, PipelineStatus::Failed, &years, Some(message), dry_run)
            .await?;
          return Err(Error::Step {
            step,
            source: Box::new(e),
          });
        }
      }
    }

    Ok(summary)
  }

  async fn record(
    &self,
    step: Step,
    status: PipelineStatus,
    years: &str,
    message: Option<String>,
    dry_run: bool,
  ) -> Result<()> {
    if dry_run {
      return Ok(());
    }
    let mut event = NewPipelineEvent::new(step.name(), status, years);
    event.error_message = message;
    self
      .log
      .append_pipeline_event(event)
      .await
      .map_err(|e| Error::Log(Box::new(e)))?;
    Ok(())
  }
}

/// Run one step outside the pipeline. Nothing is written to the pipeline log.
pub async fn run_single<X>(executor: &X, step: Step, range: YearRange, dry_run: bool) -> Result<()>
where
  X: StepExecutor,
{
  info!(%step, "running single step");
  executor
    .execute(step, range, dry_run)
    .await
    .map_err(|e| Error::Step {
      step,
      source: Box::new(e),
    })
}
