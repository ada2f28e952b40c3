use anyhow::{Context, Result};

use crate::model::RawReport;

/// Environment variable holding the bearer token for the report endpoint.
pub const TOKEN_ENV: &str = "ALARM_REPORT_TOKEN";

/// Fetch a raw report payload over HTTP. This is the thin adapter around
/// the monitoring backend; retry, refresh, and cancellation policy stay
/// with the caller, and the aggregation core never sees the network.
pub fn fetch_raw(url: &str) -> Result<RawReport> {
  let agent = ureq::AgentBuilder::new().build();

  let mut request = agent
    .get(url)
    .set("Accept", "application/json")
    .set("User-Agent", "alarm-activity-report");

  if let Ok(token) = std::env::var(TOKEN_ENV) {
    request = request.set("Authorization", &format!("Bearer {}", token));
  }

  let response = request
    .call()
    .with_context(|| format!("fetching report payload from {}", url))?;

  let raw: RawReport = response
    .into_json()
    .with_context(|| format!("parsing report payload from {} as JSON", url))?;

  Ok(raw)
}
