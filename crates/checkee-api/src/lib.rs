//! JSON read API for the visa-check tracker.
//!
//! Exposes an axum [`Router`] backed by any [`checkee_core::store::TrackerStore`].
//! Every endpoint is a `GET`; rows are written by the scraper, never here.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", checkee_api::api_router(Arc::new(store)))
//! ```

pub mod cases;
pub mod changes;
pub mod dashboard;
pub mod error;
pub mod forum;
pub mod records;
pub mod stats;
pub mod views;


use std::sync::Arc;

use axum::{Router, routing::get};
use checkee_core::store::TrackerStore;

pub use dashboard::Dashboard;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TrackerStore + 'static,
{
  Router::new()
    // Statistics
    .route("/stats", get(stats::summary::<S>))
    .route("/stats/monthly", get(stats::monthly::<S>))
    .route("/stats/consulates", get(stats::consulates::<S>))
    // Feeds and listings
    .route("/changes", get(changes::list::<S>))
    .route("/records", get(records::list::<S>))
    .route("/forum", get(forum::list::<S>))
    .route("/cases/{casenum}", get(cases::get_one::<S>))
    // Pages
    .route("/overview", get(views::overview::<S>))
    .route("/trends", get(views::trends::<S>))
    .with_state(Dashboard::new(store))
}

/// Boolean query flags are set only by `true` or `1`.
pub(crate) fn is_set(flag: Option<&str>) -> bool {
  matches!(flag.map(str::trim), Some("true" | "1"))
}
