//! [`SqliteStore`], the SQLite implementation of [`StatsStore`].

use std::{
  collections::{BTreeMap, BTreeSet},
  path::{Path, PathBuf},
};

use chrono::Utc;
use edu_core::{
  metadata::{NewPipelineEvent, PipelineEvent, SourceMetadata, SourceUpdate},
  observation::{Family, Observation},
  store::{StatsStore, TopicSlice, YearlyMean},
};
use rusqlite::{OptionalExtension as _, types::Value};
use strum::IntoEnumIterator as _;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{RawPipelineEvent, RawSourceMetadata, encode_dt, key_value, slice_value},
  schema::{self, EXPECTED_TABLES},
};

/// File name of the store inside the data directory.
pub const DB_FILE_NAME: &str = "edu_stats.db";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An observation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  path:            Option<PathBuf>,
}

/// Summary reported by `status` and `init`.
#[derive(Debug, Clone)]
pub struct DatabaseInfo {
  pub path:           Option<PathBuf>,
  pub size_bytes:     u64,
  pub tables:         Vec<String>,
  /// Every table the schema defines is present.
  pub schema_applied: bool,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with foreign keys enforced. The
  /// schema is not applied; see [`SqliteStore::apply_schema`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path)
      .await
      .map_err(|source| Error::Open {
        path: path.clone(),
        source,
      })?;
    let store = Self {
      conn,
      path: Some(path),
    };
    store.enable_foreign_keys().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, path: None };
    store.enable_foreign_keys().await?;
    Ok(store)
  }

  pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

  async fn enable_foreign_keys(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Execute a schema script. Safe to repeat.
  pub async fn apply_schema_sql(&self, sql: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Locate `schema.sql` (see [`schema::locate`]) and apply it. Returns the
  /// path that was used.
  pub async fn apply_schema(&self, explicit: Option<&Path>) -> Result<PathBuf> {
    let path = schema::locate(explicit)?;
    debug!(path = %path.display(), "applying schema");
    self.apply_schema_sql(schema::load(&path)?).await?;
    Ok(path)
  }

  /// User tables currently present, by name.
  pub async fn tables(&self) -> Result<Vec<String>> {
    let tables = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;
    Ok(tables)
  }

  pub async fn database_info(&self) -> Result<DatabaseInfo> {
    let tables = self.tables().await?;
    let schema_applied = EXPECTED_TABLES
      .iter()
      .all(|t| tables.iter().any(|have| have == t));
    let size_bytes = match &self.path {
      Some(p) => std::fs::metadata(p).map(|m| m.len()).unwrap_or(0),
      None => 0,
    };
    Ok(DatabaseInfo {
      path: self.path.clone(),
      size_bytes,
      tables,
      schema_applied,
    })
  }
}

// ─── SQL builders ────────────────────────────────────────────────────────────

/// `INSERT … ON CONFLICT(<key>) DO UPDATE SET <value> = excluded.<value>`.
fn upsert_sql(family: Family) -> String {
  let keys = family.key_columns();
  let value = family.value_column();
  let placeholders = (1..=keys.len() + 1)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO {table} ({cols}, {value}) VALUES ({placeholders})
     ON CONFLICT ({cols}) DO UPDATE SET {value} = excluded.{value}",
    table = family.table(),
    cols = keys.join(", "),
  )
}

fn yearly_means_sql(slice: &TopicSlice) -> Result<String> {
  let keys = slice.family.key_columns();
  let mut clauses = Vec::with_capacity(slice.filters.len());
  for (i, filter) in slice.filters.iter().enumerate() {
    if !keys.contains(&filter.column) {
      return Err(Error::UnknownColumn {
        family: slice.family,
        column: filter.column,
      });
    }
    clauses.push(format!("{} = ?{}", filter.column, i + 1));
  }
  let where_clause = if clauses.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", clauses.join(" AND "))
  };
  Ok(format!(
    "SELECT year, AVG({value}), COUNT(*) FROM {table} {where_clause}
     GROUP BY year ORDER BY year",
    value = slice.family.value_column(),
    table = slice.family.table(),
  ))
}

// ─── StatsStore impl ─────────────────────────────────────────────────────────

impl StatsStore for SqliteStore {
  type Error = Error;

  // ── Observations ──────────────────────────────────────────────────────────

  async fn upsert_observations(&self, rows: Vec<Observation>) -> Result<usize> {
    if rows.is_empty() {
      return Ok(0);
    }

    let sources: BTreeSet<String> =
      rows.iter().map(|o| o.source().to_owned()).collect();
    let batch: Vec<(Family, Vec<Value>)> = rows
      .into_iter()
      .map(|obs| {
        let mut params: Vec<Value> =
          obs.key().into_iter().map(key_value).collect();
        params.push(Value::Real(obs.value()));
        (obs.family(), params)
      })
      .collect();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut written = 0usize;
        {
          let mut register = tx.prepare_cached(
            "INSERT OR IGNORE INTO source_metadata (source_name) VALUES (?1)",
          )?;
          for source in &sources {
            register.execute(rusqlite::params![source])?;
          }

          for (family, params) in &batch {
            let mut stmt = tx.prepare_cached(&upsert_sql(*family))?;
            written += stmt.execute(rusqlite::params_from_iter(params.iter()))?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    Ok(written)
  }

  async fn row_counts(&self) -> Result<BTreeMap<Family, u64>> {
    let counts = self
      .conn
      .call(|conn| {
        let mut counts = BTreeMap::new();
        for family in Family::iter() {
          let n: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", family.table()),
            [],
            |row| row.get(0),
          )?;
          counts.insert(family, n.max(0) as u64);
        }
        Ok(counts)
      })
      .await?;
    Ok(counts)
  }

  async fn yearly_means(&self, slice: TopicSlice) -> Result<Vec<YearlyMean>> {
    let sql = yearly_means_sql(&slice)?;
    let params: Vec<Value> = slice.filters.iter().map(|f| slice_value(&f.value)).collect();

    let means = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            let rows: i64 = row.get(2)?;
            Ok(YearlyMean {
              year:  row.get(0)?,
              value: row.get(1)?,
              rows:  rows.max(0) as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(means)
  }

  // ── Sources ───────────────────────────────────────────────────────────────

  async fn upsert_source_metadata(&self, update: SourceUpdate) -> Result<()> {
    let now = encode_dt(Utc::now());
    let status = update.status.to_string();
    let row_count = i64::try_from(update.row_count).unwrap_or(i64::MAX);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO source_metadata (
             source_name, last_download, years_available, row_count, status,
             error_message
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (source_name) DO UPDATE SET
             last_download   = excluded.last_download,
             years_available = excluded.years_available,
             row_count       = excluded.row_count,
             status          = excluded.status,
             error_message   = excluded.error_message",
          rusqlite::params![
            update.source_name,
            now,
            update.years,
            row_count,
            status,
            update.error_message,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn source_metadata(&self) -> Result<Vec<SourceMetadata>> {
    let raws: Vec<RawSourceMetadata> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM source_metadata ORDER BY source_name",
          RawSourceMetadata::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawSourceMetadata::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSourceMetadata::into_metadata).collect()
  }

  // ── Pipeline log ──────────────────────────────────────────────────────────

  async fn append_pipeline_event(&self, event: NewPipelineEvent) -> Result<PipelineEvent> {
    let timestamp = Utc::now();
    let at_str = encode_dt(timestamp);
    let status = event.status.to_string();
    let (step, years, message) = (
      event.step_name.clone(),
      event.years_covered.clone(),
      event.error_message.clone(),
    );

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pipeline_metadata (
             step_name, timestamp, status, years_covered, error_message
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![step, at_str, status, years, message],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(PipelineEvent {
      id,
      step_name: event.step_name,
      timestamp,
      status: event.status,
      years_covered: event.years_covered,
      error_message: event.error_message,
    })
  }

  async fn last_completed_event(&self) -> Result<Option<PipelineEvent>> {
    let raw: Option<RawPipelineEvent> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM pipeline_metadata
               WHERE status = 'completed'
               ORDER BY timestamp DESC, id DESC
               LIMIT 1",
              RawPipelineEvent::COLUMNS
            ),
            [],
            RawPipelineEvent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPipelineEvent::into_event).transpose()
  }

  async fn pipeline_events(&self, limit: usize) -> Result<Vec<PipelineEvent>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let raws: Vec<RawPipelineEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM pipeline_metadata
           ORDER BY timestamp DESC, id DESC
           LIMIT ?1",
          RawPipelineEvent::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawPipelineEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPipelineEvent::into_event).collect()
  }
}

#[cfg(test)]
mod sql_tests {
  use super::*;

  #[test]
  fn upsert_targets_natural_key() {
    let sql = upsert_sql(Family::Literacy);
    assert!(sql.contains("INSERT INTO literacy_rates (year, age_group, gender, source, rate)"));
    assert!(sql.contains("VALUES (?1, ?2, ?3, ?4, ?5)"));
    assert!(sql.contains("ON CONFLICT (year, age_group, gender, source)"));
    assert!(sql.contains("DO UPDATE SET rate = excluded.rate"));
  }

  #[test]
  fn slice_columns_are_validated() {
    let ok = TopicSlice::new(Family::Proficiency)
      .text("subject", "reading")
      .integer("grade", 8);
    let sql = yearly_means_sql(&ok).unwrap();
    assert!(sql.contains("WHERE subject = ?1 AND grade = ?2"));
    assert!(sql.contains("AVG(avg_score)"));

    let bad = TopicSlice::new(Family::Literacy).text("avg_score; DROP", "x");
    assert!(matches!(
      yearly_means_sql(&bad),
      Err(Error::UnknownColumn { .. })
    ));
  }
}
