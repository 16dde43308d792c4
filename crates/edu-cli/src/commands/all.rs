//! `all`: the full pipeline, or one step of it.

use edu_core::YearRange;
use edu_ingest::IngestContext;
use tracing::info;

use crate::{
  Result,
  cli::AllArgs,
  config::{AppPaths, Settings},
  pipeline::{self, Pipeline, Step},
  steps::LiveExecutor,
};

pub async fn run(settings: &Settings, args: &AllArgs) -> Result<()> {
  // Reject a malformed range before touching the filesystem.
  let range: YearRange = args.years.parse()?;

  let paths = AppPaths::prepare(settings);
  let store = super::open_store(&paths).await?;
  // A fresh store needs its tables before the pipeline log can be read.
  store.apply_schema(settings.schema_path.as_deref()).await?;

  let executor = LiveExecutor {
    store:       &store,
    ctx:         IngestContext::new(&paths.downloads_dir)?,
    schema_path: settings.schema_path.clone(),
    output_dir:  super::output_dir(settings.output_dir.as_deref()),
  };

  if args.dry_run {
    info!("dry run: nothing will be written to the store or the output directory");
  }

  match args.step {
    Some(cmd) => pipeline::run_single(&executor, Step::from(cmd), range, args.dry_run).await,
    None => {
      let summary = Pipeline::new(&store, &executor).run(range, args.dry_run).await?;
      for (step, elapsed) in &summary.executed {
        println!("{:<18} {:>8.2}s", step.name(), elapsed.as_secs_f64());
      }
      println!("Pipeline complete for {range}");
      Ok(())
    }
  }
}
