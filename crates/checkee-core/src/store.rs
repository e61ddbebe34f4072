//! The read-only `TrackerStore` trait and its query types.
//!
//! The trait is implemented by storage backends (e.g. `checkee-store-sqlite`).
//! Higher layers (`checkee-api`) depend on this abstraction, not on any
//! concrete backend. Rows are owned by the external ingestion pipeline, so
//! there are no write methods here.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  change::{Change, ChangeType},
  record::Record,
  snapshot::Snapshot,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`TrackerStore::list_snapshots`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotQuery {
  /// Restrict to one reporting period (`YYYY-MM`).
  pub month: Option<String>,
  pub limit: Option<usize>,
}

/// Parameters for [`TrackerStore::list_records`].
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
  /// Owning snapshots. An empty list matches nothing.
  pub snapshot_ids: Vec<Uuid>,
  pub visa_type:    Option<String>,
  pub consulate:    Option<String>,
  pub status:       Option<String>,
  pub limit:        Option<usize>,
}

impl RecordQuery {
  pub fn for_snapshots(snapshot_ids: Vec<Uuid>) -> Self {
    Self { snapshot_ids, ..Self::default() }
  }
}

/// Parameters for [`TrackerStore::list_changes`].
#[derive(Debug, Clone, Default)]
pub struct ChangeQuery {
  /// Inclusive lower bound on `detected_at`.
  pub since:       Option<DateTime<Utc>>,
  pub change_type: Option<ChangeType>,
  pub casenum:     Option<String>,
  pub limit:       Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only abstraction over the snapshot/record/change tables.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Snapshots ordered by `scrape_date`, newest first.
  fn list_snapshots<'a>(
    &'a self,
    query: &'a SnapshotQuery,
  ) -> impl Future<Output = Result<Vec<Snapshot>, Self::Error>> + Send + 'a;

  /// Records belonging to `query.snapshot_ids`, narrowed by the optional
  /// equality filters.
  fn list_records<'a>(
    &'a self,
    query: &'a RecordQuery,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Changes ordered by `detected_at`, newest first.
  fn list_changes<'a>(
    &'a self,
    query: &'a ChangeQuery,
  ) -> impl Future<Output = Result<Vec<Change>, Self::Error>> + Send + 'a;

  /// Every appearance of a case across snapshots, oldest first.
  fn case_history<'a>(
    &'a self,
    casenum: &'a str,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;
}
