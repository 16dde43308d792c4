//! `edu-stats`: collect US education statistics into SQLite and export them
//! as JSON for the static site.
//!
//! # Usage
//!
//! ```
//! edu-stats init
//! edu-stats all --years 1990-2020
//! edu-stats all download-naep --dry-run
//! edu-stats status
//! ```

use anyhow::Context as _;
use clap::Parser;
use edu_cli::{
  cli::{Cli, Command},
  commands,
  config::Settings,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  if let Command::Version = cli.command {
    commands::version::run();
    return Ok(());
  }

  let settings = Settings::load(&cli.config)
    .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;

  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("failed to start runtime")?;

  runtime.block_on(async {
    match &cli.command {
      Command::Status => commands::status::run(&settings).await.context("status failed"),
      Command::Init => commands::init::run(&settings).await.context("init failed"),
      Command::Sync => commands::sync::run(&settings).await.context("sync failed"),
      Command::All(args) => commands::all::run(&settings, args).await.context("pipeline failed"),
      Command::Version => Ok(()),
    }
  })
}
