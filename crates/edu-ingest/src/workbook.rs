//! Extracting `(year, value)` pairs from Digest tables.
//!
//! The Digest publishes its tables as legacy binary workbooks (OLE2
//! compound documents). Those containers are recognised and rejected with a
//! parse error; delimited-text tables (comma or tab separated) are parsed.

use std::path::Path;

use edu_core::YearRange;
use thiserror::Error;

use crate::coerce::leading_year;

/// Title and column-header rows preceding the data in a Digest table.
pub const HEADER_ROWS: usize = 10;

const OLE2_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

#[derive(Debug, Error)]
pub enum ParseError {
  #[error("unsupported format: {0}")]
  UnsupportedFormat(&'static str),

  #[error("unreadable table: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub async fn parse_file(path: &Path, range: YearRange) -> Result<Vec<(i32, f64)>, ParseError> {
  let bytes = tokio::fs::read(path).await?;
  parse(&bytes, range)
}

/// Rows past [`HEADER_ROWS`] whose first cell starts with a year in `range`
/// and whose second cell is a positive number (`%` and `,` ignored).
pub fn parse(bytes: &[u8], range: YearRange) -> Result<Vec<(i32, f64)>, ParseError> {
  if bytes.starts_with(&OLE2_MAGIC) {
    return Err(ParseError::UnsupportedFormat("legacy binary workbook"));
  }
  if bytes.starts_with(&ZIP_MAGIC) {
    return Err(ParseError::UnsupportedFormat("zipped workbook"));
  }

  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .delimiter(sniff_delimiter(bytes))
    .from_reader(bytes);

  let mut pairs = Vec::new();
  for record in reader.records().skip(HEADER_ROWS) {
    let record = record?;
    let Some(year) = record.get(0).and_then(leading_year) else {
      continue;
    };
    let Some(value) = record.get(1).and_then(cell_number) else {
      continue;
    };
    if range.contains(year) {
      pairs.push((year, value));
    }
  }
  Ok(pairs)
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
  let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
  if first_line.contains(&b'\t') { b'\t' } else { b',' }
}

fn cell_number(cell: &str) -> Option<f64> {
  let cleaned: String = cell
    .chars()
    .filter(|c| !matches!(c, '%' | ',') && !c.is_whitespace())
    .collect();
  cleaned
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(rows: &[&str]) -> String {
    let mut out = String::new();
    for i in 0..HEADER_ROWS {
      out.push_str(&format!("Header line {i},\n"));
    }
    for row in rows {
      out.push_str(row);
      out.push('\n');
    }
    out
  }

  #[test]
  fn rejects_legacy_binary() {
    let mut bytes = OLE2_MAGIC.to_vec();
    bytes.extend_from_slice(&[0; 64]);
    let err = parse(&bytes, YearRange::DEFAULT).unwrap_err();
    assert!(err.to_string().contains("legacy binary workbook"));
  }

  #[test]
  fn parses_rows_past_header() {
    let csv = table(&["2010-11,79.0", "2011-12,\"80.0%\"", "Total,1,234", "2012-13,81.4"]);
    let pairs = parse(csv.as_bytes(), YearRange::DEFAULT).unwrap();
    assert_eq!(pairs, vec![(2010, 79.0), (2011, 80.0), (2012, 81.4)]);
  }

  #[test]
  fn clips_to_range() {
    let csv = table(&["1960,69.5", "1970,76.9", "1980,71.4"]);
    let pairs = parse(csv.as_bytes(), YearRange::new(1965, 1975).unwrap()).unwrap();
    assert_eq!(pairs, vec![(1970, 76.9)]);
  }

  #[test]
  fn tab_separated() {
    let mut text = String::new();
    for _ in 0..HEADER_ROWS {
      text.push_str("Table 219.46\tx\n");
    }
    text.push_str("2019\t86.0\n");
    let pairs = parse(text.as_bytes(), YearRange::DEFAULT).unwrap();
    assert_eq!(pairs, vec![(2019, 86.0)]);
  }

  #[test]
  fn header_rows_are_skipped_even_when_numeric() {
    let mut text = String::new();
    for _ in 0..HEADER_ROWS {
      text.push_str("2000,50.0\n");
    }
    assert!(parse(text.as_bytes(), YearRange::DEFAULT).unwrap().is_empty());
  }

  #[tokio::test]
  async fn parse_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabn219.46.xls");
    std::fs::write(&path, table(&["2019,86.0", "2020,87.0"])).unwrap();

    let pairs = parse_file(&path, YearRange::new(2020, 2020).unwrap()).await.unwrap();
    assert_eq!(pairs, vec![(2020, 87.0)]);

    let missing = parse_file(&dir.path().join("gone.xls"), YearRange::DEFAULT).await;
    assert!(matches!(missing, Err(ParseError::Io(_))));
  }
}
