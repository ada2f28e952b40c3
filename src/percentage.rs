use crate::model::PercentageEntry;

/// Build one percentage bucket with guarded division: a zero denominator
/// yields 0, never NaN or infinity. No rounding is applied here; the one
/// report that rounds (state) does so itself.
pub fn compute_entry(events: u64, total: u64) -> PercentageEntry {
  let percentage = if total > 0 {
    (events as f64 / total as f64) * 100.0
  } else {
    0.0
  };
  PercentageEntry {
    total,
    events,
    percentage,
    label: None,
    text: None,
  }
}

/// Attach a display label for rendering collaborators.
pub fn labeled(entry: PercentageEntry, label: &str) -> PercentageEntry {
  PercentageEntry {
    label: Some(label.to_string()),
    ..entry
  }
}
