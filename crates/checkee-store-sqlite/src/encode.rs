//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; offset-less ISO 8601 values written by
//! the scraper are read as UTC. Calendar dates are `YYYY-MM-DD`, and
//! UUIDs are hyphenated lowercase strings. The scraper writes
//! `0000-00-00` for unknown dates; that decodes to `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use checkee_core::{
  change::{Change, ChangeType},
  record::Record,
  snapshot::Snapshot,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "test-util"))]
pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

/// Optional calendar date. Empty strings and the `0000-00-00` placeholder are
/// absent; anything else must parse.
pub fn decode_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
  match s {
    None | Some("") | Some("0000-00-00") => Ok(None),
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Some)
      .map_err(|e| Error::Decode(format!("date {s:?}: {e}"))),
  }
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Waiting days are non-negative; negative values are treated as unknown.
pub fn decode_waiting_days(v: Option<i64>) -> Option<u32> {
  v.and_then(|n| u32::try_from(n).ok())
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const SNAPSHOT_COLUMNS: &str =
  "snapshot_id, scrape_date, month, total_records, created_at";

/// Raw values read directly from a `snapshots` row.
pub struct RawSnapshot {
  pub snapshot_id:   String,
  pub scrape_date:   String,
  pub month:         String,
  pub total_records: i64,
  pub created_at:    String,
}

impl RawSnapshot {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      snapshot_id:   row.get(0)?,
      scrape_date:   row.get(1)?,
      month:         row.get(2)?,
      total_records: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_snapshot(self) -> Result<Snapshot> {
    Ok(Snapshot {
      snapshot_id:   decode_uuid(&self.snapshot_id)?,
      scrape_date:   decode_dt(&self.scrape_date)?,
      month:         self.month,
      total_records: u32::try_from(self.total_records).map_err(|_| {
        Error::Decode(format!("total_records out of range: {}", self.total_records))
      })?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const RECORD_COLUMNS: &str = "record_id, snapshot_id, casenum, user_id, visa_type, \
   visa_entry, consulate, major, status, check_date, complete_date, waiting_days, \
   details_link, has_notes, note, month, created_at";

/// Raw values read directly from a `records` row.
pub struct RawRecord {
  pub record_id:     String,
  pub snapshot_id:   String,
  pub casenum:       String,
  pub user_id:       Option<String>,
  pub visa_type:     Option<String>,
  pub visa_entry:    Option<String>,
  pub consulate:     Option<String>,
  pub major:         Option<String>,
  pub status:        Option<String>,
  pub check_date:    Option<String>,
  pub complete_date: Option<String>,
  pub waiting_days:  Option<i64>,
  pub details_link:  Option<String>,
  pub has_notes:     bool,
  pub note:          Option<String>,
  pub month:         String,
  pub created_at:    String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:     row.get(0)?,
      snapshot_id:   row.get(1)?,
      casenum:       row.get(2)?,
      user_id:       row.get(3)?,
      visa_type:     row.get(4)?,
      visa_entry:    row.get(5)?,
      consulate:     row.get(6)?,
      major:         row.get(7)?,
      status:        row.get(8)?,
      check_date:    row.get(9)?,
      complete_date: row.get(10)?,
      waiting_days:  row.get(11)?,
      details_link:  row.get(12)?,
      has_notes:     row.get(13)?,
      note:          row.get(14)?,
      month:         row.get(15)?,
      created_at:    row.get(16)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      record_id:     decode_uuid(&self.record_id)?,
      snapshot_id:   decode_uuid(&self.snapshot_id)?,
      casenum:       self.casenum,
      user_id:       self.user_id,
      visa_type:     self.visa_type,
      visa_entry:    self.visa_entry,
      consulate:     self.consulate,
      major:         self.major,
      status:        self.status,
      check_date:    decode_date(self.check_date.as_deref())?,
      complete_date: decode_date(self.complete_date.as_deref())?,
      waiting_days:  decode_waiting_days(self.waiting_days),
      details_link:  self.details_link,
      has_notes:     self.has_notes,
      note:          self.note,
      month:         self.month,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const CHANGE_COLUMNS: &str = "change_id, casenum, snapshot_id_old, snapshot_id_new, \
   change_type, field_name, old_value, new_value, detected_at";

/// Raw values read directly from a `changes` row.
pub struct RawChange {
  pub change_id:       String,
  pub casenum:         String,
  pub snapshot_id_old: Option<String>,
  pub snapshot_id_new: String,
  pub change_type:     String,
  pub field_name:      Option<String>,
  pub old_value:       Option<String>,
  pub new_value:       Option<String>,
  pub detected_at:     String,
}

impl RawChange {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      change_id:       row.get(0)?,
      casenum:         row.get(1)?,
      snapshot_id_old: row.get(2)?,
      snapshot_id_new: row.get(3)?,
      change_type:     row.get(4)?,
      field_name:      row.get(5)?,
      old_value:       row.get(6)?,
      new_value:       row.get(7)?,
      detected_at:     row.get(8)?,
    })
  }

  pub fn into_change(self) -> Result<Change> {
    Ok(Change {
      change_id:       decode_uuid(&self.change_id)?,
      casenum:         self.casenum,
      snapshot_id_old: self.snapshot_id_old.as_deref().map(decode_uuid).transpose()?,
      snapshot_id_new: decode_uuid(&self.snapshot_id_new)?,
      change_type:     ChangeType::from(self.change_type),
      field_name:      self.field_name,
      old_value:       self.old_value,
      new_value:       self.new_value,
      detected_at:     decode_dt(&self.detected_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn placeholder_dates_decode_to_none() {
    assert_eq!(decode_date(None).unwrap(), None);
    assert_eq!(decode_date(Some("")).unwrap(), None);
    assert_eq!(decode_date(Some("0000-00-00")).unwrap(), None);
    assert_eq!(
      decode_date(Some("2026-02-09")).unwrap(),
      NaiveDate::from_ymd_opt(2026, 2, 9)
    );
    assert!(decode_date(Some("09/02/2026")).is_err());
  }

  #[test]
  fn timestamps_without_offset_are_utc() {
    use chrono::TimeZone;

    let expected = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
    assert_eq!(decode_dt("2026-02-10T12:00:00").unwrap(), expected);
    assert_eq!(decode_dt("2026-02-10T20:00:00+08:00").unwrap(), expected);
    assert_eq!(
      decode_dt("2026-02-10T12:00:00.123456").unwrap().timestamp_subsec_micros(),
      123_456
    );
    assert!(decode_dt("10 Feb 2026").is_err());
  }

  #[test]
  fn negative_waiting_days_are_unknown() {
    assert_eq!(decode_waiting_days(Some(-3)), None);
    assert_eq!(decode_waiting_days(Some(42)), Some(42));
    assert_eq!(decode_waiting_days(None), None);
  }
}
