//! Query orchestration behind every endpoint.
//!
//! [`Dashboard`] owns the injected store handle and wires the pure pipeline
//! stages from `checkee-core` to it. Queries with a data dependency (resolve
//! snapshots, then fetch their records) run in sequence. Independent ones
//! run concurrently with `tokio::join!`.
//!
//! Every method distinguishes "no data for this scope" (`Ok(None)` or an
//! empty list) from a failed query (`Err`).

use std::{collections::HashSet, sync::Arc};

use checkee_core::{
  aggregate::{
    Aggregate, ConsulateRank, MonthlyAggregate, aggregate, aggregate_by_month, top_consulates,
  },
  change::ChangeType,
  feed::{FeedEntry, build_feed, retain_for_snapshots},
  forum::{FORUM_VISA_TYPE, ForumFilter},
  record::Record,
  resolve::resolve_latest,
  snapshot::Snapshot,
  store::{ChangeQuery, RecordQuery, SnapshotQuery, TrackerStore},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Which snapshots a statistics request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  /// The most recently scraped snapshot, whatever its month.
  Latest,
  /// The authoritative snapshot of one month.
  Month(String),
  /// The authoritative snapshot of every month.
  AllMonths,
}

impl Scope {
  pub fn new(month: Option<String>, all_months: bool) -> Self {
    match (all_months, month) {
      (true, _) => Self::AllMonths,
      (false, Some(m)) => Self::Month(m),
      (false, None) => Self::Latest,
    }
  }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Aggregate statistics together with the snapshots they were computed from.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
  pub snapshots: Vec<Snapshot>,
  #[serde(flatten)]
  pub stats:     Aggregate,
}

/// Records of one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RecordListing {
  pub snapshot: Snapshot,
  pub records:  Vec<Record>,
}

/// Every appearance of a case, with its rendered change feed.
#[derive(Debug, Clone, Serialize)]
pub struct CaseHistory {
  pub casenum: String,
  pub records: Vec<Record>,
  pub changes: Vec<FeedEntry>,
}

/// Snapshots in a scope and all of their records.
#[derive(Debug, Clone)]
pub struct ScopedRecords {
  pub snapshots: Vec<Snapshot>,
  pub records:   Vec<Record>,
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Filters for the change feed.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
  pub since:       Option<DateTime<Utc>>,
  pub change_type: Option<ChangeType>,
  /// Keep only changes whose new snapshot belongs to this month.
  pub month:       Option<String>,
  pub limit:       usize,
}

/// Filters for the latest-snapshot record listing.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
  pub month:     Option<String>,
  pub visa_type: Option<String>,
  pub consulate: Option<String>,
  pub status:    Option<String>,
  pub limit:     usize,
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Read-side service over an injected [`TrackerStore`].
pub struct Dashboard<S> {
  store: Arc<S>,
}

impl<S> Clone for Dashboard<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: TrackerStore> Dashboard<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The newest snapshot, optionally restricted to one month.
  async fn newest_snapshot(&self, month: Option<&str>) -> Result<Option<Snapshot>, S::Error> {
    let query = SnapshotQuery {
      month: month.map(str::to_owned),
      limit: Some(1),
    };
    Ok(self.store.list_snapshots(&query).await?.into_iter().next())
  }

  /// Snapshots a [`Scope`] resolves to; empty when there is no data.
  pub async fn scope_snapshots(&self, scope: &Scope) -> Result<Vec<Snapshot>, S::Error> {
    match scope {
      Scope::Latest => Ok(self.newest_snapshot(None).await?.into_iter().collect()),
      Scope::Month(m) => Ok(self.newest_snapshot(Some(m)).await?.into_iter().collect()),
      Scope::AllMonths => {
        let all = self.store.list_snapshots(&SnapshotQuery::default()).await?;
        Ok(resolve_latest(all).into_snapshots())
      }
    }
  }

  /// Resolve a scope, then fetch every record it covers.
  pub async fn scope_records(&self, scope: &Scope) -> Result<Option<ScopedRecords>, S::Error> {
    let snapshots = self.scope_snapshots(scope).await?;
    if snapshots.is_empty() {
      tracing::debug!(?scope, "no snapshots in scope");
      return Ok(None);
    }
    let ids = snapshots.iter().map(|s| s.snapshot_id).collect();
    let records = self.store.list_records(&RecordQuery::for_snapshots(ids)).await?;
    Ok(Some(ScopedRecords { snapshots, records }))
  }

  pub async fn stats(&self, scope: &Scope) -> Result<Option<StatsReport>, S::Error> {
    Ok(self.scope_records(scope).await?.map(|scoped| StatsReport {
      stats:     aggregate(&scoped.records),
      snapshots: scoped.snapshots,
    }))
  }

  /// One aggregate row per month, computed from each month's authoritative
  /// snapshot.
  pub async fn monthly(&self) -> Result<Option<Vec<MonthlyAggregate>>, S::Error> {
    Ok(
      self
        .scope_records(&Scope::AllMonths)
        .await?
        .map(|scoped| aggregate_by_month(&scoped.records)),
    )
  }

  pub async fn consulates(
    &self,
    scope: &Scope,
    limit: usize,
  ) -> Result<Option<Vec<ConsulateRank>>, S::Error> {
    Ok(
      self
        .scope_records(scope)
        .await?
        .map(|scoped| top_consulates(&scoped.records, limit)),
    )
  }

  /// The labelled change feed, newest first.
  ///
  /// The month restriction is applied after the limit, against the ids of
  /// every snapshot in that month, so a page may come back shorter than
  /// `limit`.
  pub async fn changes(&self, filter: &FeedFilter) -> Result<Vec<FeedEntry>, S::Error> {
    let change_query = ChangeQuery {
      since:       filter.since,
      change_type: filter.change_type.clone(),
      casenum:     None,
      limit:       Some(filter.limit),
    };

    let changes = match &filter.month {
      None => self.store.list_changes(&change_query).await?,
      Some(month) => {
        let month_query = SnapshotQuery {
          month: Some(month.clone()),
          limit: None,
        };
        let (changes, snapshots) = tokio::join!(
          self.store.list_changes(&change_query),
          self.store.list_snapshots(&month_query),
        );
        let ids: HashSet<_> = snapshots?.into_iter().map(|s| s.snapshot_id).collect();
        retain_for_snapshots(changes?, &ids)
      }
    };

    Ok(build_feed(changes))
  }

  /// Records of the newest snapshot for `filter.month` (or overall).
  pub async fn records(&self, filter: &ListingFilter) -> Result<Option<RecordListing>, S::Error> {
    let Some(snapshot) = self.newest_snapshot(filter.month.as_deref()).await? else {
      return Ok(None);
    };
    let query = RecordQuery {
      snapshot_ids: vec![snapshot.snapshot_id],
      visa_type:    filter.visa_type.clone(),
      consulate:    filter.consulate.clone(),
      status:       filter.status.clone(),
      limit:        Some(filter.limit),
    };
    let records = self.store.list_records(&query).await?;
    Ok(Some(RecordListing { snapshot, records }))
  }

  /// H1 records with notes from the authoritative snapshot of every month.
  pub async fn forum(&self, filter: ForumFilter) -> Result<Vec<Record>, S::Error> {
    let snapshots = self.scope_snapshots(&Scope::AllMonths).await?;
    if snapshots.is_empty() {
      return Ok(Vec::new());
    }
    let query = RecordQuery {
      visa_type: Some(FORUM_VISA_TYPE.to_owned()),
      ..RecordQuery::for_snapshots(snapshots.iter().map(|s| s.snapshot_id).collect())
    };
    let records = self.store.list_records(&query).await?;
    Ok(filter.apply(records))
  }

  /// Every stored appearance of `casenum` plus its changes. `None` when the
  /// case is unknown.
  pub async fn case(&self, casenum: &str, limit: usize) -> Result<Option<CaseHistory>, S::Error> {
    let change_query = ChangeQuery {
      casenum: Some(casenum.to_owned()),
      limit: Some(limit),
      ..ChangeQuery::default()
    };
    let (records, changes) = tokio::join!(
      self.store.case_history(casenum),
      self.store.list_changes(&change_query),
    );
    let (records, changes) = (records?, changes?);
    if records.is_empty() && changes.is_empty() {
      return Ok(None);
    }
    Ok(Some(CaseHistory {
      casenum: casenum.to_owned(),
      records,
      changes: build_feed(changes),
    }))
  }
}
