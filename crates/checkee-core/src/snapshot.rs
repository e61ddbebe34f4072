//! Snapshot: one scraping run over a reporting period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point-in-time capture of the full record set for one month.
///
/// Several snapshots may share a `month`; the one with the latest
/// `scrape_date` is authoritative for that period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
  pub snapshot_id:   Uuid,
  pub scrape_date:   DateTime<Utc>,
  /// Period key in `YYYY-MM` form. Lexicographic order is chronological.
  pub month:         String,
  pub total_records: u32,
  pub created_at:    DateTime<Utc>,
}
