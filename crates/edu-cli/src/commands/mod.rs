//! One module per subcommand.

use std::path::PathBuf;

use edu_store_sqlite::SqliteStore;

use crate::{Result, config::AppPaths};

pub mod all;
pub mod init;
pub mod status;
pub mod sync;
pub mod version;

/// Open (creating if needed) the store inside `paths.data_dir`.
pub(crate) async fn open_store(paths: &AppPaths) -> Result<SqliteStore> {
  Ok(SqliteStore::open(&paths.db_path).await?)
}

/// Where generated topic files go for these settings.
pub fn output_dir(configured: Option<&std::path::Path>) -> PathBuf {
  let home = std::env::var_os("HOME")
    .filter(|v| !v.is_empty())
    .map(PathBuf::from);
  edu_export::output::resolve(configured, &edu_export::output::candidates(home.as_deref()))
}
