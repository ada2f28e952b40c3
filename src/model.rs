// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON wire model (events, accounts, raw payloads, report results) shared by aggregation and output
// role: model/types
// outputs: Serializable structs with stable wire field names matching the monitoring backend
// invariants: Wire names stay Spanish as the backend emits them; optional fields are skipped when absent; percentages map is ordered
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One signal received from an alarm panel, as the backend reports it.
/// Events arrive chronologically ascending within a day and are never
/// re-sorted here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
  /// Calendar date of the signal, YYYY-MM-DD.
  #[serde(rename = "FechaOriginal", default)]
  pub original_date: String,
  /// Wall-clock time of the signal, HH:MM:SS.
  #[serde(rename = "Hora", default)]
  pub time: String,
  /// Short code identifying the kind of signal (e.g. "O" = open).
  #[serde(rename = "CodigoAlarma", default)]
  pub alarm_code: String,
  #[serde(rename = "DescripcionEvento", default)]
  pub event_description: String,
  #[serde(rename = "DescripcionAlarma", default)]
  pub alarm_description: String,
  #[serde(rename = "CodigoZona", default)]
  pub zone_code: String,
  #[serde(rename = "DescripcionZona", default)]
  pub zone_description: String,
  #[serde(rename = "CodigoUsuario", default)]
  pub user_code: String,
  #[serde(rename = "NombreUsuario", default)]
  pub user_name: String,
  #[serde(rename = "Particion", default)]
  pub partition: i64,
}

/// Battery bucket the backend assigns to an account in the battery report.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum BatteryState {
  #[serde(rename = "ERROR")]
  Error,
  #[serde(rename = "RESTORE")]
  Restore,
  #[serde(rename = "WITHOUT-EVENTS")]
  WithoutEvents,
}

/// A monitored account. `events` absent means the query window returned no
/// events for it, which several aggregations treat as its own category.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Account {
  #[serde(rename = "CodigoCte", default)]
  pub code: String,
  #[serde(rename = "numero", default)]
  pub number: String,
  #[serde(rename = "nombre", default)]
  pub name: String,
  #[serde(rename = "direccion", default)]
  pub address: String,
  #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(rename = "totalEventos", skip_serializing_if = "Option::is_none")]
  pub event_count: Option<u64>,
  #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
  pub battery_state: Option<BatteryState>,
  #[serde(rename = "eventos", skip_serializing_if = "Option::is_none")]
  pub events: Option<Vec<Event>>,
}

/// Raw payload from the report endpoint, before aggregation. Which optional
/// fields must be present depends on the report type; the aggregator checks.
#[derive(Debug, Deserialize, Clone)]
pub struct RawReport {
  #[serde(rename = "nombre", default)]
  pub name: String,
  #[serde(rename = "cuentas")]
  pub accounts: Option<Vec<Account>>,
  /// Reporting window for apci-week, a fixed ordered list of dates.
  #[serde(rename = "fechas")]
  pub dates: Option<Vec<String>>,
  /// Grand total across the whole query; only the battery report sends it.
  #[serde(rename = "total")]
  pub total: Option<u64>,
}

/// One percentage bucket of a report. `total` is the denominator the
/// strategy chose (usually a global count, not the bucket size).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PercentageEntry {
  pub total: u64,
  pub events: u64,
  #[serde(rename = "percentaje")]
  pub percentage: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

/// Normalized result of one aggregation call. Built fresh per call, never
/// mutated afterwards; rendering collaborators consume it as-is.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportResult {
  #[serde(rename = "nombre")]
  pub account_group_name: String,
  #[serde(rename = "cuentas")]
  pub accounts: Vec<Account>,
  #[serde(rename = "fechas", skip_serializing_if = "Option::is_none")]
  pub dates: Option<Vec<String>>,
  #[serde(rename = "total", skip_serializing_if = "Option::is_none")]
  pub total: Option<u64>,
  #[serde(rename = "percentajes")]
  pub percentages: BTreeMap<String, PercentageEntry>,
}

/// The five canned report shapes the backend knows how to answer.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReportType {
  ApCi,
  EventAlarm,
  Batery,
  State,
  ApciWeek,
}

impl ReportType {
  /// Wire name, as the backend and the CLI spell it.
  pub fn as_str(&self) -> &'static str {
    match self {
      ReportType::ApCi => "ap-ci",
      ReportType::EventAlarm => "event-alarm",
      ReportType::Batery => "batery",
      ReportType::State => "state",
      ReportType::ApciWeek => "apci-week",
    }
  }
}
