//! Handlers for `/stats` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stats` | Optional `month`, `all_months=true` |
//! | `GET`  | `/stats/monthly` | One row per month, ascending |
//! | `GET`  | `/stats/consulates` | Optional `month`, `all_months`, `limit` (default 10) |

use axum::{
  Json,
  extract::{Query, State},
};
use checkee_core::{
  aggregate::{ConsulateRank, MonthlyAggregate, TOP_CONSULATES},
  normalize::present,
  params::parse_limit,
  store::TrackerStore,
};
use serde::Deserialize;

use crate::{
  dashboard::{Dashboard, Scope, StatsReport},
  error::ApiError,
  is_set,
};

#[derive(Debug, Deserialize, Default)]
pub struct ScopeParams {
  pub month:      Option<String>,
  pub all_months: Option<String>,
  pub limit:      Option<String>,
}

impl ScopeParams {
  fn scope(&self) -> Scope {
    Scope::new(
      present(self.month.as_deref()).map(str::to_owned),
      is_set(self.all_months.as_deref()),
    )
  }
}

/// `GET /stats[?month=YYYY-MM][&all_months=true]`
pub async fn summary<S>(
  State(dash): State<Dashboard<S>>,
  Query(params): Query<ScopeParams>,
) -> Result<Json<StatsReport>, ApiError>
where
  S: TrackerStore,
{
  dash
    .stats(&params.scope())
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NoData)
}

/// `GET /stats/monthly`
pub async fn monthly<S>(
  State(dash): State<Dashboard<S>>,
) -> Result<Json<Vec<MonthlyAggregate>>, ApiError>
where
  S: TrackerStore,
{
  dash
    .monthly()
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NoData)
}

/// `GET /stats/consulates[?month=YYYY-MM][&all_months=true][&limit=N]`
pub async fn consulates<S>(
  State(dash): State<Dashboard<S>>,
  Query(params): Query<ScopeParams>,
) -> Result<Json<Vec<ConsulateRank>>, ApiError>
where
  S: TrackerStore,
{
  let limit = parse_limit(params.limit.as_deref(), TOP_CONSULATES);
  dash
    .consulates(&params.scope(), limit)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NoData)
}
