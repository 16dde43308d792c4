//! `sync`: re-apply the schema to an existing store.

use crate::{
  Result,
  config::{AppPaths, Settings},
};

pub async fn run(settings: &Settings) -> Result<()> {
  let paths = AppPaths::prepare(settings);
  let store = super::open_store(&paths).await?;
  let schema = store.apply_schema(settings.schema_path.as_deref()).await?;
  println!("Schema re-applied from {} to {}", schema.display(), paths.db_path.display());
  Ok(())
}
