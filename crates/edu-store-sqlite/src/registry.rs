//! [`RawFileRegistry`] for [`SqliteStore`].

use chrono::Utc;
use edu_core::{
  raw_file::{NewRawFile, RawFile},
  store::RawFileRegistry,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawFileRow, encode_dt},
  store::SqliteStore,
};

impl RawFileRegistry for SqliteStore {
  type Error = Error;

  async fn save_raw_file(&self, file: NewRawFile) -> Result<i64> {
    let now = encode_dt(Utc::now());
    let path = file.file_path.to_string_lossy().into_owned();
    let size = i64::try_from(file.file_size).unwrap_or(i64::MAX);

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT OR IGNORE INTO source_metadata (source_name) VALUES (?1)",
          rusqlite::params![file.source_name],
        )?;
        let id: i64 = tx.query_row(
          "INSERT INTO raw_files (
             source_name, file_url, file_path, file_type, content_hash,
             file_size, downloaded_at, parsed, parsed_at, parse_error
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, NULL, NULL)
           ON CONFLICT (source_name, file_url) DO UPDATE SET
             file_path     = excluded.file_path,
             file_type     = excluded.file_type,
             content_hash  = excluded.content_hash,
             file_size     = excluded.file_size,
             downloaded_at = excluded.downloaded_at,
             parsed        = 0,
             parsed_at     = NULL,
             parse_error   = NULL
           RETURNING id",
          rusqlite::params![
            file.source_name,
            file.file_url,
            path,
            file.file_type,
            file.content_hash,
            size,
            now,
          ],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(id)
      })
      .await?;
    Ok(id)
  }

  async fn raw_file<'a>(
    &'a self,
    source_name: &'a str,
    file_url: &'a str,
  ) -> Result<Option<RawFile>> {
    let (source, url) = (source_name.to_owned(), file_url.to_owned());

    let raw: Option<RawFileRow> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM raw_files WHERE source_name = ?1 AND file_url = ?2",
              RawFileRow::COLUMNS
            ),
            rusqlite::params![source, url],
            RawFileRow::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFileRow::into_raw_file).transpose()
  }

  async fn raw_file_exists<'a>(
    &'a self,
    source_name: &'a str,
    file_url: &'a str,
    content_hash: &'a str,
  ) -> Result<bool> {
    let (source, url, hash) = (
      source_name.to_owned(),
      file_url.to_owned(),
      content_hash.to_owned(),
    );

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM raw_files
             WHERE source_name = ?1 AND file_url = ?2 AND content_hash = ?3",
            rusqlite::params![source, url, hash],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;
    Ok(exists)
  }

  async fn mark_parsed(&self, id: i64) -> Result<()> {
    let now = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE raw_files SET parsed = 1, parsed_at = ?1, parse_error = NULL
           WHERE id = ?2",
          rusqlite::params![now, id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn mark_parse_error(&self, id: i64, message: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE raw_files SET parsed = 0, parsed_at = NULL, parse_error = ?1
           WHERE id = ?2",
          rusqlite::params![message, id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn unparsed_files<'a>(&'a self, source_name: &'a str) -> Result<Vec<RawFile>> {
    let source = source_name.to_owned();

    let raws: Vec<RawFileRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM raw_files
           WHERE source_name = ?1 AND parsed = 0
           ORDER BY downloaded_at DESC, id DESC",
          RawFileRow::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![source], RawFileRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFileRow::into_raw_file).collect()
  }
}
