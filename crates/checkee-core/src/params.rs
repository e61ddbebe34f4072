//! Lenient parsing for optional query inputs.
//!
//! Malformed optional values never fail a request; they fall back to a
//! documented default instead.

use chrono::{DateTime, NaiveDate, Utc};

/// Result count used when no usable `limit` is supplied.
pub const DEFAULT_LIMIT: usize = 100;

/// Parse a result-count limit. Missing, unparseable or zero values fall back
/// to `default`.
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
  raw
    .and_then(|s| s.trim().parse::<usize>().ok())
    .filter(|&n| n > 0)
    .unwrap_or(default)
}

/// Parse a lower bound on `detected_at`: either RFC 3339 or a bare
/// `YYYY-MM-DD` date (midnight UTC). Returns `None` when unparseable.
pub fn parse_since(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn limit_falls_back_on_garbage() {
    assert_eq!(parse_limit(None, DEFAULT_LIMIT), 100);
    assert_eq!(parse_limit(Some("abc"), DEFAULT_LIMIT), 100);
    assert_eq!(parse_limit(Some("-5"), DEFAULT_LIMIT), 100);
    assert_eq!(parse_limit(Some("0"), 10), 10);
    assert_eq!(parse_limit(Some(" 25 "), DEFAULT_LIMIT), 25);
  }

  #[test]
  fn since_accepts_rfc3339_and_dates() {
    let expected = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    assert_eq!(parse_since("2026-02-01"), Some(expected));
    assert_eq!(parse_since("2026-02-01T01:00:00+01:00"), Some(expected));
    assert_eq!(parse_since("last tuesday"), None);
  }
}
