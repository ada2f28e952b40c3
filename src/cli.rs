use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::model::ReportType;

#[derive(Parser, Debug)]
#[command(
    name = "alarm-activity-report",
    version,
    about = "Aggregate raw alarm-monitoring events into classified JSON report summaries",
    long_about = None
)]
pub struct Cli {
  /// Raw report payload (JSON file); "-" reads stdin
  #[arg(long, default_value = "-")]
  pub input: String,

  /// Fetch the raw payload from this URL instead of a file
  /// (bearer token taken from ALARM_REPORT_TOKEN when set)
  #[arg(long)]
  pub url: Option<String>,

  /// Report type to aggregate
  #[arg(long, value_enum)]
  pub report_type: Option<ReportType>,

  /// Output location: file path, or "-" for stdout
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
  Stdin,
  File(PathBuf),
  Url(String),
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub source: InputSource,
  pub report_type: ReportType,
  pub out: String,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate source selection
  let source = match (&cli.url, cli.input.as_str()) {
    (Some(u), "-") => InputSource::Url(u.clone()),
    (Some(_), _) => bail!("Ambiguous input: choose only one of --input | --url"),
    (None, "-") => InputSource::Stdin,
    (None, path) => InputSource::File(PathBuf::from(path)),
  };

  let Some(report_type) = cli.report_type else {
    bail!("Provide --report-type (ap-ci | event-alarm | batery | state | apci-week)")
  };

  Ok(EffectiveConfig {
    source,
    report_type,
    out: cli.out,
  })
}
