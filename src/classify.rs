// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map alarm codes to category tags and count events per tag
// role: domain/classifier
// inputs: Alarm code strings; event slices; a classification family
// outputs: Optional CategoryTag per code; u64 counts per tag
// invariants:
// - Code tables are literal backend data and never change at runtime
// - Sets are tested in fixed priority order; first match wins even if tables overlap
// - Unknown codes classify to None and never count toward any tag
// errors: None; classification is total and silent
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::model::Event;

/// Which rule set applies: the opening/closing pair used by the ap-ci and
/// weekly reports, or the five-way split used by the event-alarm report.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Family {
  ApCi,
  EventAlarm,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CategoryTag {
  Opening,
  Closing,
  OpenClose,
  Alarm,
  Test,
  Battery,
  Other,
}

// Literal alarm-code tables from the monitoring backend.
const AP_CODES: &[&str] = &["O", "OS", "US11"];
const CI_CODES: &[&str] = &["C", "CS", "UR11"];
const APCI_CODES: &[&str] = &["C", "CS", "O", "OS", "UR11", "US11"];
const BATTERY_CODES: &[&str] = &["BB"];
const ALARM_CODES: &[&str] = &[
  "A", "ACZ", "ASA", "ATR", "CPA", "FIRE", "GA", "P", "SAS", "SMOKE", "VE",
];
const TEST_CODES: &[&str] = &[
  "AGT", "AT", "ATP", "AUT", "TST", "TST0", "TST1", "TST3", "TSTR", "TX0",
];
const OTHER_CODES: &[&str] = &[
  "1381", "24H", "ACR", "BPS", "CAS", "CN", "CTB", "ET*", "FC*", "FCA", "FT", "FT*", "IA*", "MED",
  "PA", "PAF", "PR", "PRB", "RAS", "REB", "RES", "RFC", "RON", "S99", "STL", "SUP", "TAM", "TB",
  "TEL", "TESE", "TESS", "TPL", "TRB",
];

static ALARM_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| ALARM_CODES.iter().copied().collect());
static TEST_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| TEST_CODES.iter().copied().collect());
static OTHER_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| OTHER_CODES.iter().copied().collect());

/// Classify one alarm code within a family. Returns `None` for codes the
/// family does not know; callers still count those events in their totals.
pub fn classify(alarm_code: &str, family: Family) -> Option<CategoryTag> {
  match family {
    Family::ApCi => {
      if AP_CODES.contains(&alarm_code) {
        Some(CategoryTag::Opening)
      } else if CI_CODES.contains(&alarm_code) {
        Some(CategoryTag::Closing)
      } else {
        None
      }
    }
    Family::EventAlarm => {
      if APCI_CODES.contains(&alarm_code) {
        Some(CategoryTag::OpenClose)
      } else if ALARM_SET.contains(alarm_code) {
        Some(CategoryTag::Alarm)
      } else if TEST_SET.contains(alarm_code) {
        Some(CategoryTag::Test)
      } else if BATTERY_CODES.contains(&alarm_code) {
        Some(CategoryTag::Battery)
      } else if OTHER_SET.contains(alarm_code) {
        Some(CategoryTag::Other)
      } else {
        None
      }
    }
  }
}

/// Counting primitive for the aggregator: how many events carry a code that
/// classifies to `tag` under `family`.
pub fn count(events: &[Event], family: Family, tag: CategoryTag) -> u64 {
  events
    .iter()
    .filter(|e| classify(&e.alarm_code, family) == Some(tag))
    .count() as u64
}
