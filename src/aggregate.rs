// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dispatch a raw report payload to one of five aggregation strategies and produce the normalized result
// role: domain/aggregator
// inputs: RawReport (already fetched) and a ReportType
// outputs: ReportResult with classified counts and percentage buckets
// invariants:
// - Dispatch is an exhaustive match over ReportType
// - Percentage denominators are global counts (full event list, raw total, account count, accounts x dates), never bucket sizes
// - The input payload is never mutated; results are built fresh per call
// - Only the state report rounds percentages
// errors: AggregationError names the missing or invalid payload field; no partial result is ever returned
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::classify::{self, CategoryTag, Family};
use crate::model::{
  Account, BatteryState, Event, PercentageEntry, RawReport, ReportResult, ReportType,
};
use crate::percentage::{compute_entry, labeled};
use crate::pivot::{self, PivotedAccount};
use crate::util::normalize_for_match;

#[derive(Debug, Error)]
pub enum AggregationError {
  #[error("payload for `{report_type}` is missing `cuentas`")]
  MissingAccounts { report_type: &'static str },
  #[error("report `{report_type}` works on exactly one account, payload has {found}")]
  SingleAccountRequired {
    report_type: &'static str,
    found: usize,
  },
  #[error("account `{code}` carries no `eventos`; `{report_type}` needs the event list")]
  MissingEvents {
    report_type: &'static str,
    code: String,
  },
  #[error("payload for `batery` is missing `total`")]
  MissingTotal,
  #[error("payload for `apci-week` is missing `fechas`")]
  MissingDates,
  #[error("`fechas` entry `{date}` is not a YYYY-MM-DD date")]
  InvalidDate { date: String },
}

/// Aggregate one raw payload according to the report type. Pure computation:
/// reads the input, allocates the output, touches nothing else.
pub fn aggregate(raw: &RawReport, report_type: ReportType) -> Result<ReportResult, AggregationError> {
  match report_type {
    ReportType::ApCi => ap_ci(raw),
    ReportType::EventAlarm => event_alarm(raw),
    ReportType::Batery => batery(raw),
    ReportType::State => state(raw),
    ReportType::ApciWeek => apci_week(raw),
  }
}

fn accounts_of<'a>(
  raw: &'a RawReport,
  report_type: ReportType,
) -> Result<&'a [Account], AggregationError> {
  raw
    .accounts
    .as_deref()
    .ok_or(AggregationError::MissingAccounts {
      report_type: report_type.as_str(),
    })
}

/// Precondition for the two single-account reports: exactly one account,
/// with its event list present. Explicit instead of truthiness fallthrough.
fn single_account(
  raw: &RawReport,
  report_type: ReportType,
) -> Result<(&Account, &[Event]), AggregationError> {
  let accounts = accounts_of(raw, report_type)?;
  if accounts.len() != 1 {
    return Err(AggregationError::SingleAccountRequired {
      report_type: report_type.as_str(),
      found: accounts.len(),
    });
  }
  let account = &accounts[0];
  let events = account
    .events
    .as_deref()
    .ok_or_else(|| AggregationError::MissingEvents {
      report_type: report_type.as_str(),
      code: account.code.clone(),
    })?;
  Ok((account, events))
}

/// Openings/closings split for a single account. The denominator for both
/// buckets is the full event count, so the two percentages need not sum
/// to 100.
fn ap_ci(raw: &RawReport) -> Result<ReportResult, AggregationError> {
  let (account, events) = single_account(raw, ReportType::ApCi)?;
  let total = events.len() as u64;

  let mut percentages = BTreeMap::new();
  percentages.insert(
    "Aperturas".to_string(),
    compute_entry(classify::count(events, Family::ApCi, CategoryTag::Opening), total),
  );
  percentages.insert(
    "Cierres".to_string(),
    compute_entry(classify::count(events, Family::ApCi, CategoryTag::Closing), total),
  );

  Ok(ReportResult {
    account_group_name: String::new(),
    accounts: vec![account.clone()],
    dates: None,
    total: None,
    percentages,
  })
}

/// Five-way split of a single account's events. Same global denominator
/// convention as ap-ci.
fn event_alarm(raw: &RawReport) -> Result<ReportResult, AggregationError> {
  let (account, events) = single_account(raw, ReportType::EventAlarm)?;
  let total = events.len() as u64;

  let buckets: [(&str, CategoryTag); 5] = [
    ("APCI", CategoryTag::OpenClose),
    ("Alarma", CategoryTag::Alarm),
    ("Pruebas", CategoryTag::Test),
    ("Battery", CategoryTag::Battery),
    ("Otros", CategoryTag::Other),
  ];

  let mut percentages = BTreeMap::new();
  for (key, tag) in buckets {
    percentages.insert(
      key.to_string(),
      compute_entry(classify::count(events, Family::EventAlarm, tag), total),
    );
  }

  Ok(ReportResult {
    account_group_name: String::new(),
    accounts: vec![account.clone()],
    dates: None,
    total: None,
    percentages,
  })
}

/// Battery report: accounts arrive pre-bucketed in `estado`; the denominator
/// for every bucket is the grand total the backend sent, not the bucket size.
fn batery(raw: &RawReport) -> Result<ReportResult, AggregationError> {
  let accounts = accounts_of(raw, ReportType::Batery)?;
  let total = raw.total.ok_or(AggregationError::MissingTotal)?;

  let in_state = |state: BatteryState| -> u64 {
    accounts.iter().filter(|a| a.battery_state == Some(state)).count() as u64
  };

  let mut percentages = BTreeMap::new();
  percentages.insert(
    "sinRestaure".to_string(),
    labeled(compute_entry(in_state(BatteryState::Error), total), "Sin restaure"),
  );
  percentages.insert(
    "conRestaure".to_string(),
    labeled(compute_entry(in_state(BatteryState::Restore), total), "Con restaure"),
  );
  percentages.insert(
    "sinEventos".to_string(),
    labeled(compute_entry(in_state(BatteryState::WithoutEvents), total), "Sin eventos"),
  );

  Ok(ReportResult {
    account_group_name: raw.name.clone(),
    accounts: accounts.to_vec(),
    dates: None,
    total: Some(total),
    percentages,
  })
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum BranchState {
  Open,
  Closed,
}

/// State of a branch derived from its FIRST event only. An account with no
/// events, or whose first event mentions neither keyword, has no
/// determinable state.
fn branch_state(account: &Account) -> Option<BranchState> {
  let first = account.events.as_ref()?.first()?;
  let text = normalize_for_match(&first.event_description);
  if text.contains("apert") {
    Some(BranchState::Open)
  } else if text.contains("cierr") {
    Some(BranchState::Closed)
  } else {
    None
  }
}

/// Branch-state report over all queried accounts. The only strategy that
/// rounds its percentages to whole numbers.
fn state(raw: &RawReport) -> Result<ReportResult, AggregationError> {
  let accounts = accounts_of(raw, ReportType::State)?;
  let total = accounts.len() as u64;

  let opened = accounts.iter().filter(|a| branch_state(a) == Some(BranchState::Open)).count() as u64;
  let closed =
    accounts.iter().filter(|a| branch_state(a) == Some(BranchState::Closed)).count() as u64;
  let undetermined = total - opened - closed;

  let rounded = |events: u64, label: &str| -> PercentageEntry {
    let mut entry = labeled(compute_entry(events, total), label);
    entry.percentage = entry.percentage.round();
    entry
  };

  let mut percentages = BTreeMap::new();
  percentages.insert("abiertas".to_string(), rounded(opened, "Abiertas"));
  percentages.insert("cerradas".to_string(), rounded(closed, "Cerradas"));
  percentages.insert("sinEstado".to_string(), rounded(undetermined, "Sin estado"));

  Ok(ReportResult {
    account_group_name: raw.name.clone(),
    accounts: accounts.to_vec(),
    dates: None,
    total: None,
    percentages,
  })
}

/// Weekly schedule report: pivot every account over the date window, then
/// score how many account-day slots received an opening and a closing.
fn apci_week(raw: &RawReport) -> Result<ReportResult, AggregationError> {
  let accounts = accounts_of(raw, ReportType::ApciWeek)?;
  let dates = raw.dates.as_ref().ok_or(AggregationError::MissingDates)?;
  for date in dates {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| AggregationError::InvalidDate {
      date: date.clone(),
    })?;
  }

  let pivots: Vec<PivotedAccount> =
    accounts.par_iter().map(|a| pivot::build_pivot(a, dates)).collect();

  let openings: u64 = pivots.iter().map(|p| p.openings_found).sum();
  let closings: u64 = pivots.iter().map(|p| p.closings_found).sum();
  // Every account x date pair is one slot that could have received an
  // opening and a closing.
  let total = (accounts.len() * dates.len()) as u64;

  let mut percentages = BTreeMap::new();
  percentages.insert("Aperturas".to_string(), compute_entry(openings, total));
  percentages.insert("Cierres".to_string(), compute_entry(closings, total));

  Ok(ReportResult {
    account_group_name: raw.name.clone(),
    accounts: pivots.into_iter().map(|p| p.account).collect(),
    dates: Some(dates.clone()),
    total: Some(total),
    percentages,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn event(date: &str, time: &str, code: &str, description: &str) -> Event {
    Event {
      original_date: date.into(),
      time: time.into(),
      alarm_code: code.into(),
      event_description: description.into(),
      alarm_description: String::new(),
      zone_code: String::new(),
      zone_description: String::new(),
      user_code: String::new(),
      user_name: String::new(),
      partition: 1,
    }
  }

  fn account(code: &str, events: Option<Vec<Event>>) -> Account {
    Account {
      code: code.into(),
      number: code.into(),
      name: format!("Cuenta {code}"),
      address: String::new(),
      status: None,
      event_count: None,
      battery_state: None,
      events,
    }
  }

  fn raw(accounts: Vec<Account>) -> RawReport {
    RawReport {
      name: "Grupo Norte".into(),
      accounts: Some(accounts),
      dates: None,
      total: None,
    }
  }

  #[test]
  fn ap_ci_counts_against_the_full_event_list() {
    let payload = raw(vec![account(
      "1",
      Some(vec![
        event("2025-03-03", "08:00:00", "O", ""),
        event("2025-03-03", "19:00:00", "C", ""),
        event("2025-03-03", "21:00:00", "XX", ""),
      ]),
    )]);
    let result = aggregate(&payload, ReportType::ApCi).unwrap();

    assert_eq!(result.account_group_name, "");
    assert_eq!(result.accounts.len(), 1);
    let ap = &result.percentages["Aperturas"];
    assert_eq!((ap.total, ap.events), (3, 1));
    assert!((ap.percentage - 100.0 / 3.0).abs() < 1e-9);
    let ci = &result.percentages["Cierres"];
    assert_eq!((ci.total, ci.events), (3, 1));
    // The unclassifiable "XX" keeps the two buckets from summing to 100.
    assert!(ap.percentage + ci.percentage < 100.0);
  }

  #[test]
  fn ap_ci_rejects_multiple_accounts() {
    let payload = raw(vec![account("1", Some(vec![])), account("2", Some(vec![]))]);
    let err = aggregate(&payload, ReportType::ApCi).unwrap_err();
    assert!(matches!(err, AggregationError::SingleAccountRequired { found: 2, .. }));
  }

  #[test]
  fn ap_ci_rejects_missing_event_list() {
    let payload = raw(vec![account("77", None)]);
    let err = aggregate(&payload, ReportType::ApCi).unwrap_err();
    match err {
      AggregationError::MissingEvents { code, .. } => assert_eq!(code, "77"),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn event_alarm_splits_into_five_buckets() {
    let payload = raw(vec![account(
      "1",
      Some(vec![
        event("2025-03-03", "08:00:00", "O", ""),
        event("2025-03-03", "09:00:00", "FIRE", ""),
        event("2025-03-03", "10:00:00", "TST", ""),
        event("2025-03-03", "11:00:00", "BB", ""),
        event("2025-03-03", "12:00:00", "RON", ""),
        event("2025-03-03", "13:00:00", "???", ""),
      ]),
    )]);
    let result = aggregate(&payload, ReportType::EventAlarm).unwrap();

    for key in ["APCI", "Alarma", "Pruebas", "Battery", "Otros"] {
      let entry = &result.percentages[key];
      assert_eq!(entry.events, 1, "{key}");
      assert_eq!(entry.total, 6, "{key}");
      assert!((entry.percentage - 100.0 / 6.0).abs() < 1e-9, "{key}");
    }
  }

  #[test]
  fn batery_buckets_share_the_grand_total_denominator() {
    let mut error = account("1", None);
    error.battery_state = Some(BatteryState::Error);
    let mut restore = account("2", None);
    restore.battery_state = Some(BatteryState::Restore);
    let mut quiet = account("3", None);
    quiet.battery_state = Some(BatteryState::WithoutEvents);

    let payload = RawReport {
      name: "Grupo Norte".into(),
      accounts: Some(vec![error, restore, quiet]),
      dates: None,
      total: Some(3),
    };
    let result = aggregate(&payload, ReportType::Batery).unwrap();

    for key in ["sinRestaure", "conRestaure", "sinEventos"] {
      let entry = &result.percentages[key];
      assert_eq!(entry.events, 1, "{key}");
      assert_eq!(entry.total, 3, "{key}");
      assert!((entry.percentage - 100.0 / 3.0).abs() < 1e-9, "{key}");
    }
    assert_eq!(result.total, Some(3));
    assert_eq!(result.account_group_name, "Grupo Norte");
  }

  #[test]
  fn batery_requires_the_grand_total() {
    let payload = raw(vec![account("1", None)]);
    let err = aggregate(&payload, ReportType::Batery).unwrap_err();
    assert!(matches!(err, AggregationError::MissingTotal));
  }

  #[test]
  fn state_rounds_to_whole_percentages() {
    let payload = raw(vec![
      account("1", Some(vec![event("2025-03-03", "08:00:00", "O", "Apertura de sistema")])),
      account("2", Some(vec![event("2025-03-03", "08:00:00", "C", "Cierre de sistema")])),
      account("3", None),
    ]);
    let result = aggregate(&payload, ReportType::State).unwrap();

    assert_eq!(result.percentages["abiertas"].events, 1);
    assert_eq!(result.percentages["abiertas"].percentage, 33.0);
    assert_eq!(result.percentages["cerradas"].percentage, 33.0);
    assert_eq!(result.percentages["sinEstado"].events, 1);
    assert_eq!(result.percentages["sinEstado"].percentage, 33.0);
  }

  #[test]
  fn state_match_is_case_and_diacritic_insensitive() {
    let payload = raw(vec![account(
      "1",
      Some(vec![event("2025-03-03", "08:00:00", "O", "APERTURA AUTOMÁTICA")]),
    )]);
    let result = aggregate(&payload, ReportType::State).unwrap();
    assert_eq!(result.percentages["abiertas"].events, 1);
    assert_eq!(result.percentages["abiertas"].percentage, 100.0);
  }

  #[test]
  fn state_ignores_keywords_after_the_first_event() {
    // Chosen variant: only the first event decides (see DESIGN.md).
    let payload = raw(vec![account(
      "1",
      Some(vec![
        event("2025-03-03", "02:00:00", "TST", "Prueba periodica"),
        event("2025-03-03", "08:00:00", "O", "Apertura de sistema"),
      ]),
    )]);
    let result = aggregate(&payload, ReportType::State).unwrap();
    assert_eq!(result.percentages["abiertas"].events, 0);
    assert_eq!(result.percentages["sinEstado"].events, 1);
  }

  #[test]
  fn apci_week_scores_slots_across_accounts_and_dates() {
    let mut payload = raw(vec![
      account(
        "1",
        Some(vec![
          event("2025-03-03", "08:00:00", "O", ""),
          event("2025-03-03", "19:00:00", "C", ""),
          event("2025-03-04", "08:05:00", "O", ""),
        ]),
      ),
      account("2", Some(vec![event("2025-03-04", "20:00:00", "C", "")])),
    ]);
    payload.dates = Some(vec!["2025-03-03".into(), "2025-03-04".into()]);
    let result = aggregate(&payload, ReportType::ApciWeek).unwrap();

    // 2 accounts x 2 dates = 4 slots.
    assert_eq!(result.total, Some(4));
    let ap = &result.percentages["Aperturas"];
    assert_eq!((ap.events, ap.total), (2, 4));
    assert_eq!(ap.percentage, 50.0);
    let ci = &result.percentages["Cierres"];
    assert_eq!((ci.events, ci.total), (2, 4));

    // Accounts come back with the pivoted subset, not the raw list.
    assert_eq!(result.accounts[0].events.as_ref().unwrap().len(), 3);
    assert_eq!(result.accounts[1].events.as_ref().unwrap().len(), 1);
    assert_eq!(result.dates.as_ref().unwrap().len(), 2);
  }

  #[test]
  fn apci_week_requires_dates_and_validates_them() {
    let payload = raw(vec![account("1", None)]);
    assert!(matches!(
      aggregate(&payload, ReportType::ApciWeek).unwrap_err(),
      AggregationError::MissingDates
    ));

    let mut bad = raw(vec![account("1", None)]);
    bad.dates = Some(vec!["03/03/2025".into()]);
    match aggregate(&bad, ReportType::ApciWeek).unwrap_err() {
      AggregationError::InvalidDate { date } => assert_eq!(date, "03/03/2025"),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn every_strategy_requires_accounts() {
    let payload = RawReport {
      name: String::new(),
      accounts: None,
      dates: Some(vec![]),
      total: Some(0),
    };
    for rt in [
      ReportType::ApCi,
      ReportType::EventAlarm,
      ReportType::Batery,
      ReportType::State,
      ReportType::ApciWeek,
    ] {
      let err = aggregate(&payload, rt).unwrap_err();
      assert!(
        matches!(err, AggregationError::MissingAccounts { .. }),
        "{}: {err}",
        rt.as_str()
      );
    }
  }
}
