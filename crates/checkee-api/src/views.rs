//! Composite page views: `GET /overview` and `GET /trends`.
//!
//! A page is made of independent sections. Each section is fetched on its
//! own and degrades on its own: a failed query becomes
//! [`Section::Unavailable`] and a missing dataset becomes [`Section::Empty`].
//! The page itself always answers 200.

use axum::{
  Json,
  extract::{Query, State},
};
use checkee_core::{
  aggregate::{
    ConsulateRank, MonthlyAggregate, TOP_CONSULATES, aggregate, aggregate_by_month, top_consulates,
  },
  feed::FeedEntry,
  normalize::present,
  record::{STATUS_CLEAR, STATUS_PENDING, STATUS_REJECT},
  store::TrackerStore,
};
use serde::{Deserialize, Serialize};

use crate::dashboard::{Dashboard, FeedFilter, Scope, StatsReport};

/// Consulates shown on the overview page.
pub const OVERVIEW_CONSULATES: usize = 5;
/// Changes shown on the overview page.
pub const OVERVIEW_CHANGES: usize = 10;

const NO_DATA: &str = "No data available. Run the scraper to populate the database.";
const NO_CHANGES: &str = "No recent changes detected";

// ─── Section ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Section<T> {
  Ready { data: T },
  Empty { message: String },
  Unavailable { message: String },
}

impl<T> Section<T> {
  fn ready_or_empty(data: Option<T>, empty: &str) -> Self {
    match data {
      Some(data) => Section::Ready { data },
      None => Section::Empty { message: empty.to_owned() },
    }
  }

  fn unavailable(name: &str) -> Self {
    Section::Unavailable { message: format!("Could not load {name}.") }
  }

  /// Fold a query outcome into a section, logging failures.
  fn from_outcome<E>(name: &str, outcome: Result<Option<T>, E>, empty: &str) -> Self
  where
    E: std::error::Error,
  {
    match outcome {
      Ok(data) => Self::ready_or_empty(data, empty),
      Err(e) => {
        tracing::error!(section = name, error = %e, "section unavailable");
        Self::unavailable(name)
      }
    }
  }
}

/// `Some(v)` for a non-empty list, so an empty list renders as [`Section::Empty`].
fn non_empty<T>(v: Vec<T>) -> Option<Vec<T>> { (!v.is_empty()).then_some(v) }

// ─── Overview ────────────────────────────────────────────────────────────────

/// Headline figure for one well-known status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusHighlight {
  pub status:  String,
  pub count:   usize,
  /// Percentage of the snapshot total; `0.0` when the total is zero.
  pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
  #[serde(flatten)]
  pub report:     StatsReport,
  pub highlights: Vec<StatusHighlight>,
}

impl From<StatsReport> for StatsSummary {
  fn from(report: StatsReport) -> Self {
    let highlights = [STATUS_PENDING, STATUS_CLEAR, STATUS_REJECT]
      .into_iter()
      .map(|status| StatusHighlight {
        status:  status.to_owned(),
        count:   report.stats.status_counts.get(status),
        percent: report.stats.status_share(status),
      })
      .collect();
    Self { report, highlights }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
  pub stats:          Section<StatsSummary>,
  pub top_consulates: Section<Vec<ConsulateRank>>,
  pub recent_changes: Section<Vec<FeedEntry>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OverviewParams {
  pub month: Option<String>,
}

/// `GET /overview[?month=YYYY-MM]`
pub async fn overview<S>(
  State(dash): State<Dashboard<S>>,
  Query(params): Query<OverviewParams>,
) -> Json<Overview>
where
  S: TrackerStore,
{
  let scope = Scope::new(present(params.month.as_deref()).map(str::to_owned), false);
  let feed = FeedFilter { limit: OVERVIEW_CHANGES, ..FeedFilter::default() };

  let (scoped, changes) = tokio::join!(dash.scope_records(&scope), dash.changes(&feed));

  // Stats and ranking share one record fetch, so they fail together.
  let (stats, consulates) = match scoped {
    Ok(Some(scoped)) => {
      let ranked = top_consulates(&scoped.records, OVERVIEW_CONSULATES);
      let report = StatsReport {
        stats:     aggregate(&scoped.records),
        snapshots: scoped.snapshots,
      };
      (
        Section::Ready { data: StatsSummary::from(report) },
        Section::ready_or_empty(non_empty(ranked), NO_DATA),
      )
    }
    Ok(None) => (
      Section::Empty { message: NO_DATA.to_owned() },
      Section::Empty { message: NO_DATA.to_owned() },
    ),
    Err(e) => {
      tracing::error!(error = %e, "overview statistics unavailable");
      (
        Section::unavailable("stats"),
        Section::unavailable("consulates"),
      )
    }
  };

  Json(Overview {
    stats,
    top_consulates: consulates,
    recent_changes: Section::from_outcome("changes", changes.map(non_empty), NO_CHANGES),
  })
}

// ─── Trends ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Trends {
  pub monthly:    Section<Vec<MonthlyAggregate>>,
  pub consulates: Section<Vec<ConsulateRank>>,
}

/// `GET /trends`
pub async fn trends<S>(State(dash): State<Dashboard<S>>) -> Json<Trends>
where
  S: TrackerStore,
{
  let scoped = dash.scope_records(&Scope::AllMonths).await;

  let (monthly, consulates) = match scoped {
    Ok(Some(scoped)) => (
      Section::ready_or_empty(non_empty(aggregate_by_month(&scoped.records)), NO_DATA),
      Section::ready_or_empty(non_empty(top_consulates(&scoped.records, TOP_CONSULATES)), NO_DATA),
    ),
    Ok(None) => (
      Section::Empty { message: NO_DATA.to_owned() },
      Section::Empty { message: NO_DATA.to_owned() },
    ),
    Err(e) => {
      tracing::error!(error = %e, "trend data unavailable");
      (
        Section::unavailable("monthly trends"),
        Section::unavailable("consulates"),
      )
    }
  };

  Json(Trends { monthly, consulates })
}
