//! `init`: create the data directory and apply the schema.

use tracing::info;

use crate::{
  Result,
  config::{AppPaths, Settings},
  steps::verify_tables,
};

pub async fn run(settings: &Settings) -> Result<()> {
  let paths = AppPaths::prepare(settings);
  std::fs::create_dir_all(&paths.downloads_dir)?;
  info!(dir = %paths.data_dir.display(), "data directory ready");

  let store = super::open_store(&paths).await?;
  let schema = store.apply_schema(settings.schema_path.as_deref()).await?;
  let info = store.database_info().await?;
  verify_tables(&info)?;

  println!("Initialized {}", paths.db_path.display());
  println!("Schema: {}", schema.display());
  println!("Tables:");
  for table in &info.tables {
    println!("  {table}");
  }
  Ok(())
}
