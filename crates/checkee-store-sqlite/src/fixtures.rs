//! Fixture inserts for seeding a store in tests.
//!
//! Production rows are written by the ingestion pipeline, never by this
//! crate; these helpers exist only under `cfg(test)` or the `test-util`
//! feature.

use checkee_core::{change::Change, record::Record, snapshot::Snapshot};

use crate::{
  SqliteStore,
  encode::{encode_date, encode_dt, encode_uuid},
  Result,
};

impl SqliteStore {
  pub async fn insert_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
    let id_str      = encode_uuid(snapshot.snapshot_id);
    let scraped_str = encode_dt(snapshot.scrape_date);
    let month       = snapshot.month.clone();
    let total       = i64::from(snapshot.total_records);
    let created_str = encode_dt(snapshot.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO snapshots (snapshot_id, scrape_date, month, total_records, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, scraped_str, month, total, created_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub async fn insert_records(&self, records: &[Record]) -> Result<()> {
    let records = records.to_vec();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO records (
               record_id, snapshot_id, casenum, user_id, visa_type, visa_entry,
               consulate, major, status, check_date, complete_date, waiting_days,
               details_link, has_notes, note, month, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
          )?;
          for r in &records {
            stmt.execute(rusqlite::params![
              encode_uuid(r.record_id),
              encode_uuid(r.snapshot_id),
              r.casenum,
              r.user_id,
              r.visa_type,
              r.visa_entry,
              r.consulate,
              r.major,
              r.status,
              r.check_date.map(encode_date),
              r.complete_date.map(encode_date),
              r.waiting_days,
              r.details_link,
              r.has_notes,
              r.note,
              r.month,
              encode_dt(r.created_at),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub async fn insert_changes(&self, changes: &[Change]) -> Result<()> {
    let changes = changes.to_vec();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO changes (
               change_id, casenum, snapshot_id_old, snapshot_id_new, change_type,
               field_name, old_value, new_value, detected_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for c in &changes {
            stmt.execute(rusqlite::params![
              encode_uuid(c.change_id),
              c.casenum,
              c.snapshot_id_old.map(encode_uuid),
              encode_uuid(c.snapshot_id_new),
              c.change_type.as_str(),
              c.field_name,
              c.old_value,
              c.new_value,
              encode_dt(c.detected_at),
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
