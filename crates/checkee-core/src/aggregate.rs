//! Aggregation engine: counts and waiting-day statistics over records.
//!
//! Everything here is a linear scan with counter accumulation. Records are
//! folded into an [`Accumulator`] per group, and each group computes its own
//! waiting-day figures. Nothing is shared between groups.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{normalize::category, record::Record};

/// Default length of the consulate ranking.
pub const TOP_CONSULATES: usize = 10;

// ─── CategoryCounts ──────────────────────────────────────────────────────────

/// Counts keyed by category label, with absent values in the `"Unknown"`
/// bucket. Iteration is sorted by key; the order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts(BTreeMap<String, usize>);

impl CategoryCounts {
  /// Count one occurrence of an optional category value.
  pub fn add(&mut self, value: Option<&str>) {
    *self.0.entry(category(value).to_owned()).or_default() += 1;
  }

  /// Count for `key`, zero when never seen.
  pub fn get(&self, key: &str) -> usize { self.0.get(key).copied().unwrap_or(0) }

  /// Sum over all buckets.
  pub fn total(&self) -> usize { self.0.values().sum() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.0.iter().map(|(k, v)| (k.as_str(), *v))
  }
}

// ─── Percentages ─────────────────────────────────────────────────────────────

/// `count` as a percentage of `total`. An empty total yields `0.0`.
pub fn percent_of(count: usize, total: usize) -> f64 {
  if total == 0 {
    0.0
  } else {
    count as f64 / total as f64 * 100.0
  }
}

// ─── Waiting days ────────────────────────────────────────────────────────────

/// Mean, minimum and maximum of the present `waiting_days` values. Absent
/// values are skipped rather than counted as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct WaitingDays {
  sum:   u64,
  count: u64,
  min:   Option<u32>,
  max:   Option<u32>,
}

impl WaitingDays {
  fn add(&mut self, days: Option<u32>) {
    let Some(days) = days else { return };
    self.sum += u64::from(days);
    self.count += 1;
    self.min = Some(self.min.map_or(days, |m| m.min(days)));
    self.max = Some(self.max.map_or(days, |m| m.max(days)));
  }

  fn mean(&self) -> Option<f64> {
    (self.count > 0).then(|| self.sum as f64 / self.count as f64)
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Statistics for one group of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
  pub total_records:    usize,
  pub status_counts:    CategoryCounts,
  pub visa_type_counts: CategoryCounts,
  pub consulate_counts: CategoryCounts,
  /// `None` when no record in the group has a waiting-day value.
  pub avg_waiting_days: Option<f64>,
  pub min_waiting_days: Option<u32>,
  pub max_waiting_days: Option<u32>,
}

impl Aggregate {
  /// Share of this group's records carrying `status`, as a percentage.
  pub fn status_share(&self, status: &str) -> f64 {
    percent_of(self.status_counts.get(status), self.total_records)
  }
}

/// Incremental builder for an [`Aggregate`].
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
  total:      usize,
  statuses:   CategoryCounts,
  visa_types: CategoryCounts,
  consulates: CategoryCounts,
  waiting:    WaitingDays,
}

impl Accumulator {
  pub fn push(&mut self, record: &Record) {
    self.total += 1;
    self.statuses.add(record.status.as_deref());
    self.visa_types.add(record.visa_type.as_deref());
    self.consulates.add(record.consulate.as_deref());
    self.waiting.add(record.waiting_days);
  }

  pub fn finish(self) -> Aggregate {
    Aggregate {
      total_records:    self.total,
      status_counts:    self.statuses,
      visa_type_counts: self.visa_types,
      consulate_counts: self.consulates,
      avg_waiting_days: self.waiting.mean(),
      min_waiting_days: self.waiting.min,
      max_waiting_days: self.waiting.max,
    }
  }
}

/// Aggregate every record into a single group.
pub fn aggregate<'a, I>(records: I) -> Aggregate
where
  I: IntoIterator<Item = &'a Record>,
{
  let mut acc = Accumulator::default();
  for record in records {
    acc.push(record);
  }
  acc.finish()
}

// ─── Time series ─────────────────────────────────────────────────────────────

/// One row of the monthly time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
  pub month: String,
  #[serde(flatten)]
  pub stats: Aggregate,
}

/// Group records by `month`, one row per month in ascending key order.
pub fn aggregate_by_month<'a, I>(records: I) -> Vec<MonthlyAggregate>
where
  I: IntoIterator<Item = &'a Record>,
{
  let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
  for record in records {
    groups.entry(record.month.as_str()).or_default().push(record);
  }
  groups
    .into_iter()
    .map(|(month, acc)| MonthlyAggregate {
      month: month.to_owned(),
      stats: acc.finish(),
    })
    .collect()
}

// ─── Consulate ranking ───────────────────────────────────────────────────────

/// A consulate's position in the ranking, with its own waiting-day figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsulateRank {
  pub consulate:        String,
  pub count:            usize,
  pub avg_waiting_days: Option<f64>,
  pub min_waiting_days: Option<u32>,
  pub max_waiting_days: Option<u32>,
}

/// The `limit` busiest consulates by record count, busiest first.
///
/// Equal counts keep the order in which each consulate first appeared in
/// `records`.
pub fn top_consulates<'a, I>(records: I, limit: usize) -> Vec<ConsulateRank>
where
  I: IntoIterator<Item = &'a Record>,
{
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut groups: Vec<(&str, usize, WaitingDays)> = Vec::new();

  for record in records {
    let key = category(record.consulate.as_deref());
    let slot = *index.entry(key).or_insert_with(|| {
      groups.push((key, 0, WaitingDays::default()));
      groups.len() - 1
    });
    let (_, count, waiting) = &mut groups[slot];
    *count += 1;
    waiting.add(record.waiting_days);
  }

  // `sort_by` is stable, which keeps first-encounter order on ties.
  groups.sort_by(|a, b| b.1.cmp(&a.1));
  groups
    .into_iter()
    .take(limit)
    .map(|(consulate, count, waiting)| ConsulateRank {
      consulate: consulate.to_owned(),
      count,
      avg_waiting_days: waiting.mean(),
      min_waiting_days: waiting.min,
      max_waiting_days: waiting.max,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::normalize::UNKNOWN;

  fn record(month: &str, status: Option<&str>, waiting_days: Option<u32>) -> Record {
    Record {
      record_id: Uuid::new_v4(),
      snapshot_id: Uuid::nil(),
      casenum: "1".into(),
      user_id: None,
      visa_type: Some("H1".into()),
      visa_entry: None,
      consulate: Some("Beijing".into()),
      major: None,
      status: status.map(str::to_owned),
      check_date: None,
      complete_date: None,
      waiting_days,
      details_link: None,
      has_notes: false,
      note: None,
      month: month.into(),
      created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
  }

  fn at_consulate(consulate: Option<&str>, waiting_days: Option<u32>) -> Record {
    let mut r = record("2026-01", Some("Pending"), waiting_days);
    r.consulate = consulate.map(str::to_owned);
    r
  }

  #[test]
  fn aggregates_counts_and_waiting_days() {
    let records = vec![
      record("2026-02", Some("Pending"), Some(10)),
      record("2026-02", Some("Clear"), Some(20)),
      record("2026-02", Some("Clear"), None),
    ];
    let stats = aggregate(&records);

    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.status_counts.get("Pending"), 1);
    assert_eq!(stats.status_counts.get("Clear"), 2);
    assert_eq!(stats.status_counts.len(), 2);
    assert_eq!(stats.avg_waiting_days, Some(15.0));
    assert_eq!(stats.min_waiting_days, Some(10));
    assert_eq!(stats.max_waiting_days, Some(20));
  }

  #[test]
  fn counts_are_conserved_across_dimensions() {
    let mut records = vec![
      record("2026-01", None, None),
      record("2026-01", Some(""), Some(3)),
      record("2026-01", Some("Reject"), Some(7)),
    ];
    records[0].visa_type = None;
    records[1].consulate = Some(String::new());

    let stats = aggregate(&records);
    assert_eq!(stats.status_counts.total(), stats.total_records);
    assert_eq!(stats.visa_type_counts.total(), stats.total_records);
    assert_eq!(stats.consulate_counts.total(), stats.total_records);
    assert_eq!(stats.status_counts.get(UNKNOWN), 2);
    assert_eq!(stats.visa_type_counts.get(UNKNOWN), 1);
    assert_eq!(stats.consulate_counts.get(UNKNOWN), 1);
  }

  #[test]
  fn waiting_days_absent_when_no_values() {
    let records = vec![record("2026-01", Some("Pending"), None)];
    let stats = aggregate(&records);
    assert_eq!(stats.avg_waiting_days, None);
    assert_eq!(stats.min_waiting_days, None);
    assert_eq!(stats.max_waiting_days, None);
  }

  #[test]
  fn mean_lies_between_min_and_max() {
    let records: Vec<_> = [4, 91, 13, 0, 57]
      .into_iter()
      .map(|d| record("2026-01", Some("Clear"), Some(d)))
      .collect();
    let stats = aggregate(&records);
    let avg = stats.avg_waiting_days.unwrap();
    assert!(f64::from(stats.min_waiting_days.unwrap()) <= avg);
    assert!(avg <= f64::from(stats.max_waiting_days.unwrap()));
  }

  #[test]
  fn empty_input_is_an_empty_aggregate() {
    let stats = aggregate(&Vec::new());
    assert_eq!(stats, Aggregate::default());
    assert_eq!(stats.status_share("Pending"), 0.0);
  }

  #[test]
  fn percent_of_zero_total_is_zero() {
    assert_eq!(percent_of(0, 0), 0.0);
    assert_eq!(percent_of(5, 0), 0.0);
    assert_eq!(percent_of(1, 4), 25.0);
  }

  #[test]
  fn monthly_series_is_sorted_and_computed_per_month() {
    let records = vec![
      record("2026-02", Some("Clear"), Some(40)),
      record("2026-01", Some("Pending"), Some(10)),
      record("2026-02", Some("Pending"), None),
      record("2026-01", Some("Clear"), Some(20)),
    ];
    let series = aggregate_by_month(&records);

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].month, "2026-01");
    assert_eq!(series[1].month, "2026-02");
    assert_eq!(series[0].stats.total_records, 2);
    assert_eq!(series[0].stats.avg_waiting_days, Some(15.0));
    assert_eq!(series[1].stats.avg_waiting_days, Some(40.0));
    assert_eq!(series[1].stats.min_waiting_days, Some(40));
  }

  #[test]
  fn consulate_ranking_is_stable_and_truncated() {
    let records = vec![
      at_consulate(Some("Shanghai"), Some(30)),
      at_consulate(Some("Beijing"), Some(10)),
      at_consulate(Some("Guangzhou"), None),
      at_consulate(Some("Beijing"), Some(20)),
      at_consulate(None, None),
    ];

    let ranked = top_consulates(&records, 3);
    let names: Vec<_> = ranked.iter().map(|r| r.consulate.as_str()).collect();
    assert_eq!(names, ["Beijing", "Shanghai", "Guangzhou"]);
    assert_eq!(ranked[0].count, 2);
    assert_eq!(ranked[0].avg_waiting_days, Some(15.0));
    assert_eq!(ranked[2].avg_waiting_days, None);

    let all = top_consulates(&records, TOP_CONSULATES);
    assert_eq!(all.len(), 4);
    assert_eq!(all[3].consulate, UNKNOWN);
  }

  #[test]
  fn serialises_with_flat_waiting_fields() {
    let records = vec![record("2026-01", Some("Clear"), Some(8))];
    let json = serde_json::to_value(aggregate_by_month(&records)).unwrap();
    assert_eq!(json[0]["month"], "2026-01");
    assert_eq!(json[0]["total_records"], 1);
    assert_eq!(json[0]["status_counts"]["Clear"], 1);
    assert_eq!(json[0]["avg_waiting_days"], 8.0);
  }
}
