// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run: load the raw payload, aggregate it, write the result
// role: processing/orchestrator
// inputs: EffectiveConfig (source, report type, out target)
// outputs: Pretty JSON on stdout or written to --out
// side_effects: Reads files/stdin or performs one HTTP GET; writes the output file
// invariants:
// - Aggregation failures propagate before anything is written; no partial result reaches --out
// - "-" means stdout; any other --out value is treated as a file path
// errors: Load/parse/write errors carry the source or path in context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use std::io::Read;

use crate::aggregate;
use crate::cli::{EffectiveConfig, InputSource};
use crate::fetch;
use crate::model::{RawReport, ReportResult};

fn load_raw(source: &InputSource) -> Result<RawReport> {
  match source {
    InputSource::Stdin => {
      let mut buf = String::new();
      std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading report payload from stdin")?;
      serde_json::from_str(&buf).context("parsing stdin payload as a raw report")
    }
    InputSource::File(path) => {
      let buf = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
      serde_json::from_slice(&buf)
        .with_context(|| format!("parsing {} as a raw report", path.display()))
    }
    InputSource::Url(url) => fetch::fetch_raw(url),
  }
}

fn write_result(out: &str, result: &ReportResult) -> Result<()> {
  if out == "-" {
    println!("{}", serde_json::to_string_pretty(result)?);
    return Ok(());
  }
  let path = std::path::Path::new(out);
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
  }
  std::fs::write(path, serde_json::to_vec_pretty(result)?)
    .with_context(|| format!("writing {}", path.display()))
}

pub fn run_report(cfg: &EffectiveConfig) -> Result<()> {
  let raw = load_raw(&cfg.source)?;
  let result = aggregate::aggregate(&raw, cfg.report_type)
    .with_context(|| format!("aggregating `{}` report", cfg.report_type.as_str()))?;
  write_result(&cfg.out, &result)
}
