//! The production [`StepExecutor`]: schema check, the five source adapters
//! and the exporter, all against one [`SqliteStore`].

use std::path::PathBuf;

use edu_core::YearRange;
use edu_ingest::IngestContext;
use edu_store_sqlite::{DatabaseInfo, SqliteStore, schema::EXPECTED_TABLES};
use tracing::info;

use crate::{
  Error, Result,
  pipeline::{Step, StepExecutor},
};

pub struct LiveExecutor<'a> {
  pub store:       &'a SqliteStore,
  pub ctx:         IngestContext,
  pub schema_path: Option<PathBuf>,
  pub output_dir:  PathBuf,
}

impl LiveExecutor<'_> {
  async fn check_schema(&self) -> Result<()> {
    let path = self.store.apply_schema(self.schema_path.as_deref()).await?;
    info!(schema = %path.display(), "schema applied");

    let info = self.store.database_info().await?;
    verify_tables(&info)?;
    info!(tables = info.tables.len(), "schema verified");
    Ok(())
  }
}

/// Fail with the missing table names unless every expected table exists.
pub fn verify_tables(info: &DatabaseInfo) -> Result<()> {
  if info.schema_applied {
    return Ok(());
  }
  let missing = EXPECTED_TABLES
    .iter()
    .filter(|t| !info.tables.iter().any(|have| have == *t))
    .map(|t| (*t).to_owned())
    .collect();
  Err(Error::SchemaIncomplete(missing))
}

impl StepExecutor for LiveExecutor<'_> {
  type Error = Error;

  async fn execute(&self, step: Step, range: YearRange, dry_run: bool) -> Result<()> {
    match step {
      Step::CheckSchema => self.check_schema().await,
      Step::GenerateAssets => {
        let report = edu_export::export(self.store, &self.output_dir, dry_run).await?;
        info!(
          files = report.written.len(),
          empty = report.empty.len(),
          dir = %report.output_dir.display(),
          "assets generated"
        );
        Ok(())
      }
      download => {
        let Some(source) = download.source() else {
          return Ok(());
        };
        let reports = edu_ingest::run(source, &self.ctx, self.store, range, dry_run).await?;
        for r in &reports {
          info!(
            source = %r.source_name,
            rows = r.rows(),
            status = %r.status,
            "source finished"
          );
        }
        Ok(())
      }
    }
  }
}
