//! Change feed: labels and field-level diff text for change rows.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  change::{Change, ChangeType},
  normalize::present,
};

/// A change row ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
  pub change_id:   Uuid,
  pub casenum:     String,
  pub change_type: ChangeType,
  pub label:       String,
  pub detail:      Option<String>,
  pub detected_at: DateTime<Utc>,
}

impl From<Change> for FeedEntry {
  fn from(change: Change) -> Self {
    let detail = render_detail(&change);
    Self {
      change_id: change.change_id,
      casenum: change.casenum,
      label: change.change_type.label().to_owned(),
      change_type: change.change_type,
      detail,
      detected_at: change.detected_at,
    }
  }
}

/// Detail text for one change.
///
/// - With a field name: `"field: old → new"`, showing only the sides that
///   are present; the arrow needs both.
/// - Without one: the new value alone (`new_record`, `note_added`).
pub fn render_detail(change: &Change) -> Option<String> {
  let old = present(change.old_value.as_deref());
  let new = present(change.new_value.as_deref());

  let Some(field) = present(change.field_name.as_deref()) else {
    return new.map(str::to_owned);
  };

  let values = match (old, new) {
    (Some(o), Some(n)) => format!(" {o} → {n}"),
    (Some(v), None) | (None, Some(v)) => format!(" {v}"),
    (None, None) => String::new(),
  };
  Some(format!("{field}:{values}"))
}

/// Keep only changes whose `snapshot_id_new` is in `snapshot_ids`, in order.
pub fn retain_for_snapshots(changes: Vec<Change>, snapshot_ids: &HashSet<Uuid>) -> Vec<Change> {
  changes
    .into_iter()
    .filter(|c| snapshot_ids.contains(&c.snapshot_id_new))
    .collect()
}

/// Render a feed, preserving input order.
pub fn build_feed(changes: Vec<Change>) -> Vec<FeedEntry> {
  changes.into_iter().map(FeedEntry::from).collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn change(
    change_type: &str,
    field: Option<&str>,
    old: Option<&str>,
    new: Option<&str>,
  ) -> Change {
    Change {
      change_id:       Uuid::new_v4(),
      casenum:         "844578".into(),
      snapshot_id_old: None,
      snapshot_id_new: Uuid::new_v4(),
      change_type:     ChangeType::parse(change_type),
      field_name:      field.map(str::to_owned),
      old_value:       old.map(str::to_owned),
      new_value:       new.map(str::to_owned),
      detected_at:     Utc.with_ymd_and_hms(2026, 2, 10, 8, 30, 0).unwrap(),
    }
  }

  #[test]
  fn status_change_renders_label_and_arrow() {
    let entry = FeedEntry::from(change(
      "status_change",
      Some("status"),
      Some("Pending"),
      Some("Clear"),
    ));
    assert_eq!(entry.label, "Status Changed");
    assert_eq!(entry.detail.as_deref(), Some("status: Pending → Clear"));
  }

  #[test]
  fn one_sided_field_omits_arrow() {
    let c = change("date_update", Some("complete_date"), None, Some("2026-02-09"));
    assert_eq!(render_detail(&c).as_deref(), Some("complete_date: 2026-02-09"));

    let c = change("note_updated", Some("note"), Some("waiting"), Some(""));
    assert_eq!(render_detail(&c).as_deref(), Some("note: waiting"));

    let c = change("date_update", Some("check_date"), None, None);
    assert_eq!(render_detail(&c).as_deref(), Some("check_date:"));
  }

  #[test]
  fn fieldless_change_shows_new_value_only() {
    let c = change("new_record", None, Some("ignored"), Some("New record: 1234"));
    assert_eq!(render_detail(&c).as_deref(), Some("New record: 1234"));

    let c = change("new_record", None, None, None);
    assert_eq!(render_detail(&c), None);
  }

  #[test]
  fn unknown_type_uses_raw_label() {
    let entry = FeedEntry::from(change("major_fixed", None, None, Some("CS")));
    assert_eq!(entry.label, "major_fixed");
  }

  #[test]
  fn month_post_filter_preserves_order() {
    let a = change("status_change", None, None, None);
    let b = change("note_added", None, None, None);
    let c = change("new_record", None, None, None);
    let keep: HashSet<Uuid> = [a.snapshot_id_new, c.snapshot_id_new].into();

    let kept = retain_for_snapshots(vec![a.clone(), b, c.clone()], &keep);
    assert_eq!(kept, vec![a, c]);
  }

  #[test]
  fn feed_preserves_input_order() {
    let changes = vec![
      change("new_record", None, None, Some("x")),
      change("status_change", Some("status"), Some("Pending"), Some("Reject")),
    ];
    let ids: Vec<_> = changes.iter().map(|c| c.change_id).collect();
    let feed = build_feed(changes);
    assert_eq!(feed.iter().map(|e| e.change_id).collect::<Vec<_>>(), ids);
  }
}
