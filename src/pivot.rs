// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Reduce one account's events to at most one opening and one closing per reporting date
// role: domain/pivot
// inputs: An Account (events optional) and the ordered date window
// outputs: PivotedAccount with the selected events and openings/closings found counts
// invariants:
// - Per day: first opening by list order, last closing by list order; 0, 1, or 2 events emitted
// - Days with no events emit nothing (empty slot)
// - The account's original unfiltered event list is replaced by the selection
// - Input order is trusted as chronological; nothing is re-sorted
// errors: None; an account without events pivots to an empty selection
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::classify::{self, CategoryTag, Family};
use crate::model::{Account, Event};

pub struct PivotedAccount {
  pub account: Account,
  /// Days on which an opening was found.
  pub openings_found: u64,
  /// Days on which a closing was found.
  pub closings_found: u64,
}

/// Build the per-date opening/closing pivot for one account.
///
/// The tie-break is asymmetric on purpose: the first opening of a day and
/// the last closing of a day survive (first arrival opens, last departure
/// closes).
pub fn build_pivot(account: &Account, dates: &[String]) -> PivotedAccount {
  let events: &[Event] = account.events.as_deref().unwrap_or(&[]);
  let mut selected: Vec<Event> = Vec::new();
  let mut openings_found = 0u64;
  let mut closings_found = 0u64;

  for date in dates {
    let day: Vec<&Event> = events.iter().filter(|e| &e.original_date == date).collect();
    if day.is_empty() {
      continue;
    }

    let opening = day
      .iter()
      .find(|e| classify::classify(&e.alarm_code, Family::ApCi) == Some(CategoryTag::Opening));
    let closing = day
      .iter()
      .rev()
      .find(|e| classify::classify(&e.alarm_code, Family::ApCi) == Some(CategoryTag::Closing));

    if let Some(e) = opening {
      selected.push((*e).clone());
      openings_found += 1;
    }
    if let Some(e) = closing {
      selected.push((*e).clone());
      closings_found += 1;
    }
  }

  let mut account = account.clone();
  account.events = Some(selected);

  PivotedAccount {
    account,
    openings_found,
    closings_found,
  }
}
