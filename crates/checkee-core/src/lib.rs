//! Core types and pure pipeline stages for the Checkee tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the data model, the read-only [`store::TrackerStore`] abstraction,
//! and the four transformations every view is built from: snapshot
//! resolution, aggregation, change-feed rendering, and forum filtering.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod change;
pub mod feed;
pub mod forum;
pub mod normalize;
pub mod params;
pub mod record;
pub mod resolve;
pub mod snapshot;
pub mod store;
