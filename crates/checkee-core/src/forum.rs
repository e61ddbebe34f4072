//! Forum filter: H1 records carrying a free-text note.
//!
//! [`ForumFilter::matches`] is the one predicate used everywhere a forum
//! listing is narrowed, so re-applying it to an already filtered listing
//! never changes the result.

use crate::{
  normalize::present,
  record::{Record, STATUS_CLEAR},
};

/// Visa type the forum is restricted to.
pub const FORUM_VISA_TYPE: &str = "H1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForumFilter {
  /// Drop records whose status is `Clear`.
  pub exclude_approved: bool,
}

impl Default for ForumFilter {
  fn default() -> Self { Self { exclude_approved: true } }
}

impl ForumFilter {
  pub fn new(exclude_approved: bool) -> Self { Self { exclude_approved } }

  /// Read the `exclude_approved` query flag. Anything other than the literal
  /// `"false"` (including absence) keeps approved records out.
  pub fn from_flag(flag: Option<&str>) -> Self {
    match flag {
      Some("false") => Self::new(false),
      _ => Self::default(),
    }
  }

  pub fn matches(&self, record: &Record) -> bool {
    record.visa_type.as_deref() == Some(FORUM_VISA_TYPE)
      && present(record.note.as_deref()).is_some()
      && !(self.exclude_approved && record.status.as_deref() == Some(STATUS_CLEAR))
  }

  /// Retain matching records, most recent activity first. Records with the
  /// same activity time keep their input order.
  pub fn apply(&self, mut records: Vec<Record>) -> Vec<Record> {
    records.retain(|r| self.matches(r));
    records.sort_by(|a, b| b.activity_at().cmp(&a.activity_at()));
    records
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn record(status: &str, note: Option<&str>, check_date: Option<(i32, u32, u32)>) -> Record {
    Record {
      record_id: Uuid::new_v4(),
      snapshot_id: Uuid::nil(),
      casenum: "1".into(),
      user_id: None,
      visa_type: Some(FORUM_VISA_TYPE.into()),
      visa_entry: None,
      consulate: None,
      major: None,
      status: Some(status.into()),
      check_date: check_date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
      complete_date: None,
      waiting_days: None,
      details_link: None,
      has_notes: note.is_some(),
      note: note.map(str::to_owned),
      month: "2026-01".into(),
      created_at: Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
    }
  }

  #[test]
  fn requires_h1_and_a_note() {
    let f = ForumFilter::new(false);
    assert!(f.matches(&record("Pending", Some("any update?"), None)));
    assert!(!f.matches(&record("Pending", None, None)));
    assert!(!f.matches(&record("Pending", Some(""), None)));

    let mut f1 = record("Pending", Some("note"), None);
    f1.visa_type = Some("F1".into());
    assert!(!f.matches(&f1));
  }

  #[test]
  fn exclude_approved_drops_clear_only() {
    let f = ForumFilter::new(true);
    assert!(!f.matches(&record("Clear", Some("done"), None)));
    assert!(f.matches(&record("Reject", Some("sad"), None)));
    assert!(ForumFilter::new(false).matches(&record("Clear", Some("done"), None)));
  }

  #[test]
  fn flag_parsing_defaults_to_excluding() {
    assert_eq!(ForumFilter::from_flag(None), ForumFilter::default());
    assert!(ForumFilter::from_flag(None).exclude_approved);
    assert!(ForumFilter::from_flag(Some("true")).exclude_approved);
    assert!(ForumFilter::from_flag(Some("yes")).exclude_approved);
    assert!(!ForumFilter::from_flag(Some("false")).exclude_approved);
  }

  #[test]
  fn sorts_by_check_date_then_created_at() {
    let old = record("Pending", Some("a"), Some((2025, 12, 1)));
    let undated = record("Pending", Some("b"), None); // created 2026-01-15
    let new = record("Pending", Some("c"), Some((2026, 2, 3)));

    let out = ForumFilter::new(false).apply(vec![old.clone(), undated.clone(), new.clone()]);
    assert_eq!(out, vec![new, undated, old]);
  }

  #[test]
  fn applying_twice_is_idempotent() {
    let input = vec![
      record("Clear", Some("x"), Some((2026, 1, 2))),
      record("Pending", Some("y"), Some((2026, 1, 3))),
      record("Pending", None, None),
      record("Reject", Some("z"), None),
    ];
    let f = ForumFilter::new(true);
    let once = f.apply(input);
    let twice = f.apply(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
  }

  #[test]
  fn narrowing_an_inclusive_listing_matches_direct_filtering() {
    let input = vec![
      record("Clear", Some("x"), Some((2026, 1, 2))),
      record("Pending", Some("y"), Some((2026, 1, 3))),
    ];
    let narrowed = ForumFilter::new(true).apply(ForumFilter::new(false).apply(input.clone()));
    assert_eq!(narrowed, ForumFilter::new(true).apply(input));
  }
}
