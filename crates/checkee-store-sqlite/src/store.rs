//! [`SqliteStore`], the SQLite implementation of [`TrackerStore`].

use std::path::Path;

use checkee_core::{
  change::Change,
  record::Record,
  snapshot::Snapshot,
  store::{ChangeQuery, RecordQuery, SnapshotQuery, TrackerStore},
};
use rusqlite::types::Value;

use crate::{
  encode::{
    CHANGE_COLUMNS, RECORD_COLUMNS, RawChange, RawRecord, RawSnapshot, SNAPSHOT_COLUMNS,
    encode_dt, encode_uuid,
  },
  schema::SCHEMA,
  Result,
};

// ─── Filter builder ──────────────────────────────────────────────────────────

/// Accumulates `WHERE` conditions with positional parameters.
#[derive(Default)]
struct Filter {
  conds:  Vec<String>,
  params: Vec<Value>,
}

impl Filter {
  fn push(&mut self, cond: &str, value: Value) {
    self.params.push(value);
    self.conds.push(cond.replace('?', &format!("?{}", self.params.len())));
  }

  fn eq(&mut self, column: &str, value: Option<String>) {
    if let Some(v) = value {
      self.push(&format!("{column} = ?"), Value::Text(v));
    }
  }

  fn is_in(&mut self, column: &str, values: impl IntoIterator<Item = String>) {
    let mut slots = Vec::new();
    for v in values {
      self.params.push(Value::Text(v));
      slots.push(format!("?{}", self.params.len()));
    }
    self.conds.push(format!("{column} IN ({})", slots.join(", ")));
  }

  /// Finish with a `LIMIT` bound; SQLite treats a negative limit as none.
  fn limit(mut self, limit: Option<usize>) -> (String, String, Vec<Value>) {
    let where_clause = if self.conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.conds.join(" AND "))
    };
    let limit_val = limit.and_then(|n| i64::try_from(n).ok()).unwrap_or(-1);
    self.params.push(Value::Integer(limit_val));
    let limit_clause = format!("LIMIT ?{}", self.params.len());
    (where_clause, limit_clause, self.params)
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tracker store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_records(&self, sql: String, params: Vec<Value>) -> Result<Vec<Record>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = crate::Error;

  async fn list_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<Snapshot>> {
    let mut filter = Filter::default();
    filter.eq("month", query.month.clone());
    let (where_clause, limit_clause, params) = filter.limit(query.limit);

    // Timestamps carry mixed offsets, so compare instants, not text. Ties
    // fall back to insertion order.
    let sql = format!(
      "SELECT {SNAPSHOT_COLUMNS} FROM snapshots
       {where_clause}
       ORDER BY julianday(scrape_date) DESC, rowid ASC
       {limit_clause}"
    );

    let raws: Vec<RawSnapshot> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawSnapshot::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSnapshot::into_snapshot).collect()
  }

  async fn list_records(&self, query: &RecordQuery) -> Result<Vec<Record>> {
    if query.snapshot_ids.is_empty() {
      return Ok(Vec::new());
    }

    let mut filter = Filter::default();
    filter.is_in("snapshot_id", query.snapshot_ids.iter().copied().map(encode_uuid));
    filter.eq("visa_type", query.visa_type.clone());
    filter.eq("consulate", query.consulate.clone());
    filter.eq("status", query.status.clone());
    let (where_clause, limit_clause, params) = filter.limit(query.limit);

    let sql = format!(
      "SELECT {RECORD_COLUMNS} FROM records
       {where_clause}
       ORDER BY rowid ASC
       {limit_clause}"
    );
    self.query_records(sql, params).await
  }

  async fn list_changes(&self, query: &ChangeQuery) -> Result<Vec<Change>> {
    let mut filter = Filter::default();
    if let Some(since) = query.since {
      filter.push("julianday(detected_at) >= julianday(?)", Value::Text(encode_dt(since)));
    }
    filter.eq("change_type", query.change_type.as_ref().map(|t| t.as_str().to_owned()));
    filter.eq("casenum", query.casenum.clone());
    let (where_clause, limit_clause, params) = filter.limit(query.limit);

    let sql = format!(
      "SELECT {CHANGE_COLUMNS} FROM changes
       {where_clause}
       ORDER BY julianday(detected_at) DESC, rowid ASC
       {limit_clause}"
    );

    let raws: Vec<RawChange> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawChange::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChange::into_change).collect()
  }

  async fn case_history(&self, casenum: &str) -> Result<Vec<Record>> {
    let sql = format!(
      "SELECT {RECORD_COLUMNS} FROM records
       WHERE casenum = ?1
       ORDER BY julianday(created_at) ASC, rowid ASC"
    );
    self.query_records(sql, vec![Value::Text(casenum.to_owned())]).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_numbers_parameters_in_order() {
    let mut f = Filter::default();
    f.is_in("snapshot_id", ["a".to_string(), "b".to_string()]);
    f.eq("status", None);
    f.eq("consulate", Some("Beijing".into()));
    let (where_clause, limit_clause, params) = f.limit(Some(5));

    assert_eq!(where_clause, "WHERE snapshot_id IN (?1, ?2) AND consulate = ?3");
    assert_eq!(limit_clause, "LIMIT ?4");
    assert_eq!(params.len(), 4);
    assert_eq!(params[3], Value::Integer(5));
  }

  #[test]
  fn empty_filter_has_no_where_and_unbounded_limit() {
    let (where_clause, _, params) = Filter::default().limit(None);
    assert!(where_clause.is_empty());
    assert_eq!(params, vec![Value::Integer(-1)]);
  }
}
