//! Handler for `GET /cases/{casenum}`.

use axum::{
  Json,
  extract::{Path, State},
};
use checkee_core::{params::DEFAULT_LIMIT, store::TrackerStore};

use crate::{
  dashboard::{CaseHistory, Dashboard},
  error::ApiError,
};

/// `GET /cases/{casenum}`. 404 if the case never appeared.
pub async fn get_one<S>(
  State(dash): State<Dashboard<S>>,
  Path(casenum): Path<String>,
) -> Result<Json<CaseHistory>, ApiError>
where
  S: TrackerStore,
{
  dash
    .case(&casenum, DEFAULT_LIMIT)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("case {casenum} not found")))
}
