//! Change: one detected difference between two consecutive snapshots.
//!
//! Change rows are produced by the external ingestion pipeline and are
//! strictly append-only; this crate only reads and renders them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── ChangeType ──────────────────────────────────────────────────────────────

/// The kind of difference the ingestion pipeline detected.
///
/// The set is open: values this crate does not recognise are kept verbatim in
/// [`ChangeType::Other`] and pass through every stage untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeType {
  StatusChange,
  DateUpdate,
  NoteAdded,
  NoteUpdated,
  NewRecord,
  WaitingDaysUpdate,
  Other(String),
}

impl ChangeType {
  /// Parse the discriminant stored in the `change_type` column.
  pub fn parse(s: &str) -> Self {
    match s {
      "status_change" => Self::StatusChange,
      "date_update" => Self::DateUpdate,
      "note_added" => Self::NoteAdded,
      "note_updated" => Self::NoteUpdated,
      "new_record" => Self::NewRecord,
      "waiting_days_update" => Self::WaitingDaysUpdate,
      other => Self::Other(other.to_owned()),
    }
  }

  /// The discriminant string stored in the `change_type` column.
  pub fn as_str(&self) -> &str {
    match self {
      Self::StatusChange => "status_change",
      Self::DateUpdate => "date_update",
      Self::NoteAdded => "note_added",
      Self::NoteUpdated => "note_updated",
      Self::NewRecord => "new_record",
      Self::WaitingDaysUpdate => "waiting_days_update",
      Self::Other(raw) => raw,
    }
  }

  /// Human-readable label for the feed. Unrecognised types fall back to
  /// their raw discriminant.
  pub fn label(&self) -> &str {
    match self {
      Self::StatusChange => "Status Changed",
      Self::DateUpdate => "Date Updated",
      Self::NoteAdded => "Note Added",
      Self::NoteUpdated => "Note Updated",
      Self::NewRecord => "New Record",
      Self::WaitingDaysUpdate => "Waiting Days Updated",
      Self::Other(raw) => raw,
    }
  }
}

impl From<String> for ChangeType {
  fn from(s: String) -> Self {
    match Self::parse(&s) {
      Self::Other(_) => Self::Other(s),
      known => known,
    }
  }
}

impl From<ChangeType> for String {
  fn from(t: ChangeType) -> Self {
    match t {
      ChangeType::Other(raw) => raw,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for ChangeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Change ──────────────────────────────────────────────────────────────────

/// A single entry of the append-only change log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
  pub change_id:       Uuid,
  pub casenum:         String,
  /// `None` when the case had never been seen before.
  pub snapshot_id_old: Option<Uuid>,
  pub snapshot_id_new: Uuid,
  pub change_type:     ChangeType,
  pub field_name:      Option<String>,
  pub old_value:       Option<String>,
  pub new_value:       Option<String>,
  pub detected_at:     DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_types_round_trip_through_strings() {
    for raw in [
      "status_change",
      "date_update",
      "note_added",
      "note_updated",
      "new_record",
      "waiting_days_update",
    ] {
      let t = ChangeType::parse(raw);
      assert!(!matches!(t, ChangeType::Other(_)), "{raw} parsed as Other");
      assert_eq!(String::from(t), raw);
    }
  }

  #[test]
  fn unknown_type_passes_through() {
    let t = ChangeType::from("consulate_moved".to_string());
    assert_eq!(t, ChangeType::Other("consulate_moved".into()));
    assert_eq!(t.label(), "consulate_moved");
    assert_eq!(t.to_string(), "consulate_moved");
  }

  #[test]
  fn serialises_as_plain_string() {
    let json = serde_json::to_string(&ChangeType::NoteAdded).unwrap();
    assert_eq!(json, "\"note_added\"");
    let back: ChangeType = serde_json::from_str("\"mystery\"").unwrap();
    assert_eq!(back, ChangeType::Other("mystery".into()));
  }
}
