//! Record: one visa-application case as it appeared in a snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_CLEAR: &str = "Clear";
pub const STATUS_REJECT: &str = "Reject";

/// A single case row. The same `casenum` recurs across snapshots as the case
/// evolves; those rows are linked only by equal `casenum` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub record_id:     Uuid,
  pub snapshot_id:   Uuid,
  /// Business key, stable across snapshots.
  pub casenum:       String,
  pub user_id:       Option<String>,
  pub visa_type:     Option<String>,
  pub visa_entry:    Option<String>,
  pub consulate:     Option<String>,
  pub major:         Option<String>,
  /// Open free text; `Pending`, `Clear` and `Reject` are the common values.
  pub status:        Option<String>,
  pub check_date:    Option<NaiveDate>,
  pub complete_date: Option<NaiveDate>,
  pub waiting_days:  Option<u32>,
  pub details_link:  Option<String>,
  pub has_notes:     bool,
  pub note:          Option<String>,
  pub month:         String,
  pub created_at:    DateTime<Utc>,
}

impl Record {
  /// The moment the forum orders by: `check_date` at midnight UTC when
  /// present, otherwise the row's `created_at`.
  pub fn activity_at(&self) -> DateTime<Utc> {
    self
      .check_date
      .and_then(|d| d.and_hms_opt(0, 0, 0))
      .map(|dt| dt.and_utc())
      .unwrap_or(self.created_at)
  }
}
