//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pipeline::Step;

#[derive(Parser, Debug)]
#[command(name = "edu-stats", version, about = "US education statistics pipeline")]
pub struct Cli {
  /// Path to a TOML settings file (data_dir, output_dir, schema_path).
  #[arg(short, long, global = true, value_name = "FILE", default_value = "edu-stats.toml")]
  pub config: PathBuf,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Show store size, schema, source freshness, row counts and remote reachability.
  Status,
  /// Create the data directory and apply the schema.
  Init,
  /// Re-apply the schema.
  Sync,
  /// Run the full pipeline, or a single step of it.
  All(AllArgs),
  /// Print the version.
  Version,
}

#[derive(Args, Debug)]
pub struct AllArgs {
  /// Inclusive year range, YYYY-YYYY.
  #[arg(long, global = true, value_name = "YYYY-YYYY", default_value = "1970-2025")]
  pub years: String,

  /// Log what would happen without writing to the store or the output directory.
  #[arg(long, global = true)]
  pub dry_run: bool,

  #[command(subcommand)]
  pub step: Option<StepCommand>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
  /// Apply and verify the schema.
  CheckSchema,
  /// World Bank literacy rates.
  DownloadWorldbank,
  /// Census educational attainment.
  DownloadCensus,
  /// NCES Digest graduation and enrollment tables.
  DownloadNces,
  /// NAEP national average scale scores.
  DownloadNaep,
  /// ECLS early-childhood measures.
  DownloadEcls,
  /// Write the topic JSON files.
  GenerateAssets,
}

impl From<StepCommand> for Step {
  fn from(cmd: StepCommand) -> Self {
    match cmd {
      StepCommand::CheckSchema => Step::CheckSchema,
      StepCommand::DownloadWorldbank => Step::DownloadWorldbank,
      StepCommand::DownloadCensus => Step::DownloadCensus,
      StepCommand::DownloadNces => Step::DownloadNces,
      StepCommand::DownloadNaep => Step::DownloadNaep,
      StepCommand::DownloadEcls => Step::DownloadEcls,
      StepCommand::GenerateAssets => Step::GenerateAssets,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_full_pipeline_defaults() {
    let cli = Cli::try_parse_from(["edu-stats", "all"]).unwrap();
    let Command::All(args) = cli.command else {
      panic!("expected all");
    };
    assert_eq!(args.years, "1970-2025");
    assert!(!args.dry_run);
    assert!(args.step.is_none());
    assert_eq!(cli.config, PathBuf::from("edu-stats.toml"));
  }

  #[test]
  fn parses_single_step_with_options() {
    let cli = Cli::try_parse_from([
      "edu-stats",
      "--config",
      "/etc/edu.toml",
      "all",
      "download-worldbank",
      "--years",
      "1990-2000",
      "--dry-run",
    ])
    .unwrap();
    let Command::All(args) = cli.command else {
      panic!("expected all");
    };
    assert_eq!(args.step, Some(StepCommand::DownloadWorldbank));
    assert_eq!(args.years, "1990-2000");
    assert!(args.dry_run);
    assert_eq!(Step::from(StepCommand::DownloadWorldbank).to_string(), "download-worldbank");
  }

  #[test]
  fn step_command_names_match_steps() {
    for (arg, step) in [
      ("check-schema", Step::CheckSchema),
      ("download-nces", Step::DownloadNces),
      ("generate-assets", Step::GenerateAssets),
    ] {
      let cli = Cli::try_parse_from(["edu-stats", "all", arg]).unwrap();
      let Command::All(args) = cli.command else {
        panic!("expected all");
      };
      assert_eq!(args.step.map(Step::from), Some(step));
    }
  }

  #[test]
  fn rejects_unknown_command() {
    assert!(Cli::try_parse_from(["edu-stats", "publish"]).is_err());
  }
}
