//! Handler for `GET /forum`.

use axum::{
  Json,
  extract::{Query, State},
};
use checkee_core::{forum::ForumFilter, record::Record, store::TrackerStore};
use serde::{Deserialize, Serialize};

use crate::{dashboard::Dashboard, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct ForumParams {
  /// Approved records are hidden unless this is exactly `false`.
  pub exclude_approved: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForumListing {
  pub exclude_approved: bool,
  pub count:            usize,
  pub records:          Vec<Record>,
}

/// `GET /forum[?exclude_approved=false]`
pub async fn list<S>(
  State(dash): State<Dashboard<S>>,
  Query(params): Query<ForumParams>,
) -> Result<Json<ForumListing>, ApiError>
where
  S: TrackerStore,
{
  let filter = ForumFilter::from_flag(params.exclude_approved.as_deref());
  let records = dash.forum(filter).await.map_err(ApiError::store)?;
  Ok(Json(ForumListing {
    exclude_approved: filter.exclude_approved,
    count:            records.len(),
    records,
  }))
}
