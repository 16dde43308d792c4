//! Inclusive calendar-year ranges.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::{Error, Result};

/// An inclusive `[start, end]` range of calendar years.
///
/// Parsed from the `YYYY-YYYY` form accepted on the command line and rendered
/// compactly: `1990-1995`, or just `1990` when both ends coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearRange {
  start: i32,
  end:   i32,
}

impl YearRange {
  /// The range used when `--years` is not given.
  pub const DEFAULT: YearRange = YearRange { start: 1970, end: 2025 };

  pub fn new(start: i32, end: i32) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidYearRange {
        input:  format!("{start}-{end}"),
        reason: "start year must not be after end year".into(),
      });
    }
    Ok(Self { start, end })
  }

  pub fn start(&self) -> i32 { self.start }

  pub fn end(&self) -> i32 { self.end }

  pub fn contains(&self, year: i32) -> bool {
    (self.start..=self.end).contains(&year)
  }

  /// Intersect with `[lo, hi]`; `None` when the two do not overlap.
  pub fn clamp(&self, lo: i32, hi: i32) -> Option<YearRange> {
    let start = self.start.max(lo);
    let end = self.end.min(hi);
    (start <= end).then_some(YearRange { start, end })
  }

  pub fn years(&self) -> RangeInclusive<i32> { self.start..=self.end }
}

impl Default for YearRange {
  fn default() -> Self { Self::DEFAULT }
}

impl fmt::Display for YearRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.start == self.end {
      write!(f, "{}", self.start)
    } else {
      write!(f, "{}-{}", self.start, self.end)
    }
  }
}

impl FromStr for YearRange {
  type Err = Error;

  fn from_str(input: &str) -> Result<Self> {
    let invalid = |reason: &str| Error::InvalidYearRange {
      input:  input.to_owned(),
      reason: reason.to_owned(),
    };

    let (start, end) = input
      .trim()
      .split_once('-')
      .ok_or_else(|| invalid("expected the form YYYY-YYYY"))?;

    let parse_year = |s: &str, which: &str| {
      let s = s.trim();
      if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(&format!("{which} year {s:?} is not a four-digit year")));
      }
      s.parse::<i32>()
        .map_err(|_| invalid(&format!("{which} year {s:?} is not a number")))
    };

    let start = parse_year(start, "start")?;
    let end = parse_year(end, "end")?;
    if start > end {
      return Err(invalid("start year must not be after end year"));
    }
    Ok(Self { start, end })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_displays() {
    let r: YearRange = "1990-1995".parse().unwrap();
    assert_eq!((r.start(), r.end()), (1990, 1995));
    assert_eq!(r.to_string(), "1990-1995");

    let single: YearRange = "2001-2001".parse().unwrap();
    assert_eq!(single.to_string(), "2001");
  }

  #[test]
  fn rejects_reversed_range() {
    let err = "2020-2010".parse::<YearRange>().unwrap_err();
    assert!(err.to_string().contains("2020-2010"));
  }

  #[test]
  fn rejects_malformed_input() {
    for input in ["2020", "20-2010", "abcd-2010", "1990-19x5", ""] {
      assert!(input.parse::<YearRange>().is_err(), "{input:?} should not parse");
    }
  }

  #[test]
  fn clamp_intersects() {
    let r = YearRange::new(1970, 2025).unwrap();
    assert_eq!(r.clamp(2010, 2023), Some(YearRange::new(2010, 2023).unwrap()));

    let early = YearRange::new(1990, 2000).unwrap();
    assert_eq!(early.clamp(2010, 2023), None);
  }

  #[test]
  fn contains_is_inclusive() {
    let r = YearRange::new(1990, 1995).unwrap();
    assert!(r.contains(1990));
    assert!(r.contains(1995));
    assert!(!r.contains(1989));
    assert!(!r.contains(1996));
    assert_eq!(r.years().count(), 6);
  }
}
