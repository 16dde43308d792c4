//! Lenient number handling for remote payloads.
//!
//! Services disagree on whether numbers travel as JSON numbers or as numeric
//! strings. Both are accepted; null, empty, non-numeric and zero values are
//! dropped.

use serde_json::Value;

/// A positive finite number, from a JSON number or numeric string.
pub fn number(value: &Value) -> Option<f64> {
  let n = match value {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => s.trim().replace(',', "").parse().ok()?,
    _ => return None,
  };
  (n.is_finite() && n != 0.0).then_some(n)
}

/// A calendar year, from a JSON number or a string starting with one.
pub fn year(value: &Value) -> Option<i32> {
  match value {
    Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
    Value::String(s) => leading_year(s),
    _ => None,
  }
  .filter(|&y| y > 0)
}

/// The first four characters of `s` as a year, when they are all digits.
pub fn leading_year(s: &str) -> Option<i32> {
  let s = s.trim();
  let head = s.get(..4)?;
  if !head.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  head.parse().ok()
}
