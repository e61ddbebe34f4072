//! Handler for `GET /changes`.
//!
//! `since` accepts RFC 3339 or `YYYY-MM-DD`; an unparseable value is ignored.
//! `limit` defaults to 100.

use axum::{
  Json,
  extract::{Query, State},
};
use checkee_core::{
  change::ChangeType,
  feed::FeedEntry,
  normalize::present,
  params::{DEFAULT_LIMIT, parse_limit, parse_since},
  store::TrackerStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  dashboard::{Dashboard, FeedFilter},
  error::ApiError,
};

#[derive(Debug, Deserialize, Default)]
pub struct ChangeParams {
  pub since:       Option<String>,
  pub month:       Option<String>,
  pub change_type: Option<String>,
  pub limit:       Option<String>,
}

impl ChangeParams {
  fn into_filter(self) -> FeedFilter {
    let since = present(self.since.as_deref()).and_then(|raw| {
      let parsed = parse_since(raw);
      if parsed.is_none() {
        tracing::warn!(since = raw, "ignoring unparseable `since`");
      }
      parsed
    });
    FeedFilter {
      since,
      change_type: present(self.change_type.as_deref()).map(ChangeType::parse),
      month: present(self.month.as_deref()).map(str::to_owned),
      limit: parse_limit(self.limit.as_deref(), DEFAULT_LIMIT),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ChangeFeed {
  pub changes: Vec<FeedEntry>,
}

/// `GET /changes[?since=...][&month=...][&change_type=...][&limit=N]`
pub async fn list<S>(
  State(dash): State<Dashboard<S>>,
  Query(params): Query<ChangeParams>,
) -> Result<Json<ChangeFeed>, ApiError>
where
  S: TrackerStore,
{
  let changes = dash
    .changes(&params.into_filter())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(ChangeFeed { changes }))
}
