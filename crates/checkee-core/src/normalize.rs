//! Null-handling shared by every grouping and rendering stage.
//!
//! The ingestion pipeline stores missing text either as `NULL` or as an empty
//! string. Both mean "absent", and absent grouping keys land in the
//! [`UNKNOWN`] bucket.

/// Bucket name for records whose grouping field is absent.
pub const UNKNOWN: &str = "Unknown";

/// `Some(s)` only for a present, non-empty value.
pub fn present(value: Option<&str>) -> Option<&str> {
  value.filter(|s| !s.is_empty())
}

/// The grouping key for an optional category field.
pub fn category(value: Option<&str>) -> &str {
  present(value).unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn null_and_empty_coalesce_to_unknown() {
    assert_eq!(category(None), UNKNOWN);
    assert_eq!(category(Some("")), UNKNOWN);
    assert_eq!(category(Some("Pending")), "Pending");
  }

  #[test]
  fn whitespace_is_a_value() {
    assert_eq!(present(Some(" ")), Some(" "));
  }
}
