//! Latest-snapshot resolution.
//!
//! Each month may be scraped many times. Only the most recent capture per
//! month is authoritative, and every aggregate, listing, and forum view is
//! computed against that set.

use std::collections::{BTreeMap, btree_map::Entry};

use uuid::Uuid;

use crate::snapshot::Snapshot;

/// One authoritative snapshot per month, iterated in ascending month order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestSnapshots {
  by_month: BTreeMap<String, Snapshot>,
}

impl LatestSnapshots {
  pub fn get(&self, month: &str) -> Option<&Snapshot> { self.by_month.get(month) }

  pub fn len(&self) -> usize { self.by_month.len() }

  pub fn is_empty(&self) -> bool { self.by_month.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &Snapshot> { self.by_month.values() }

  pub fn months(&self) -> impl Iterator<Item = &str> {
    self.by_month.keys().map(String::as_str)
  }

  /// Ids of every resolved snapshot, in month order.
  pub fn snapshot_ids(&self) -> Vec<Uuid> {
    self.iter().map(|s| s.snapshot_id).collect()
  }

  /// The most recently scraped snapshot across all months.
  pub fn latest(&self) -> Option<&Snapshot> {
    self.iter().fold(None, |best: Option<&Snapshot>, s| match best {
      Some(b) if b.scrape_date >= s.scrape_date => Some(b),
      _ => Some(s),
    })
  }

  pub fn into_snapshots(self) -> Vec<Snapshot> { self.by_month.into_values().collect() }
}

/// Keep the most recent snapshot per month.
///
/// Input is expected newest-first, so the first snapshot seen for a month
/// normally wins. A later one replaces it only when its `scrape_date` is
/// strictly greater; equal timestamps keep the one encountered first.
pub fn resolve_latest<I>(snapshots: I) -> LatestSnapshots
where
  I: IntoIterator<Item = Snapshot>,
{
  let mut by_month = BTreeMap::new();
  for snapshot in snapshots {
    match by_month.entry(snapshot.month.clone()) {
      Entry::Vacant(slot) => {
        slot.insert(snapshot);
      }
      Entry::Occupied(mut slot) => {
        if snapshot.scrape_date > slot.get().scrape_date {
          slot.insert(snapshot);
        }
      }
    }
  }
  LatestSnapshots { by_month }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};

  use super::*;

  fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
  }

  fn snap(month: &str, scraped: DateTime<Utc>) -> Snapshot {
    Snapshot {
      snapshot_id:   Uuid::new_v4(),
      scrape_date:   scraped,
      month:         month.into(),
      total_records: 0,
      created_at:    scraped,
    }
  }

  #[test]
  fn empty_input_resolves_to_nothing() {
    let latest = resolve_latest(Vec::new());
    assert!(latest.is_empty());
    assert!(latest.latest().is_none());
    assert!(latest.snapshot_ids().is_empty());
  }

  #[test]
  fn picks_newest_capture_per_month() {
    let older = snap("2026-02", at(2026, 2, 5));
    let newer = snap("2026-02", at(2026, 2, 10));
    let latest = resolve_latest(vec![newer.clone(), older]);

    assert_eq!(latest.len(), 1);
    assert_eq!(latest.get("2026-02"), Some(&newer));
  }

  #[test]
  fn unordered_input_still_keeps_the_maximum() {
    let older = snap("2026-02", at(2026, 2, 5));
    let newer = snap("2026-02", at(2026, 2, 10));
    let latest = resolve_latest(vec![older, newer.clone()]);
    assert_eq!(latest.get("2026-02"), Some(&newer));
  }

  #[test]
  fn identical_timestamps_keep_first_encountered() {
    let first = snap("2026-01", at(2026, 1, 3));
    let second = snap("2026-01", at(2026, 1, 3));
    let latest = resolve_latest(vec![first.clone(), second]);
    assert_eq!(latest.get("2026-01"), Some(&first));
  }

  #[test]
  fn one_entry_per_month_with_maximal_date() {
    let input = vec![
      snap("2026-03", at(2026, 3, 9)),
      snap("2026-01", at(2026, 3, 8)),
      snap("2026-03", at(2026, 3, 1)),
      snap("2026-02", at(2026, 2, 20)),
      snap("2026-01", at(2026, 1, 30)),
    ];
    let latest = resolve_latest(input.clone());

    assert_eq!(latest.months().collect::<Vec<_>>(), ["2026-01", "2026-02", "2026-03"]);
    for resolved in latest.iter() {
      let max = input
        .iter()
        .filter(|s| s.month == resolved.month)
        .map(|s| s.scrape_date)
        .max()
        .unwrap();
      assert_eq!(resolved.scrape_date, max);
    }
    assert_eq!(latest.latest().unwrap().scrape_date, at(2026, 3, 9));
  }
}
