//! Handler for `GET /records`: the newest snapshot's records, narrowed by
//! equality filters.

use axum::{
  Json,
  extract::{Query, State},
};
use checkee_core::{
  normalize::present,
  params::{DEFAULT_LIMIT, parse_limit},
  store::TrackerStore,
};
use serde::Deserialize;

use crate::{
  dashboard::{Dashboard, ListingFilter, RecordListing},
  error::ApiError,
};

#[derive(Debug, Deserialize, Default)]
pub struct RecordParams {
  pub month:     Option<String>,
  pub consulate: Option<String>,
  pub visa_type: Option<String>,
  pub status:    Option<String>,
  pub limit:     Option<String>,
}

/// `GET /records[?month=...][&consulate=...][&visa_type=...][&status=...][&limit=N]`
pub async fn list<S>(
  State(dash): State<Dashboard<S>>,
  Query(params): Query<RecordParams>,
) -> Result<Json<RecordListing>, ApiError>
where
  S: TrackerStore,
{
  let owned = |v: &Option<String>| present(v.as_deref()).map(str::to_owned);
  let filter = ListingFilter {
    month:     owned(&params.month),
    visa_type: owned(&params.visa_type),
    consulate: owned(&params.consulate),
    status:    owned(&params.status),
    limit:     parse_limit(params.limit.as_deref(), DEFAULT_LIMIT),
  };

  dash
    .records(&filter)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or(ApiError::NoData)
}
