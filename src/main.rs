use anyhow::Result;
use clap::Parser;

mod aggregate;
mod classify;
mod cli;
mod fetch;
mod model;
mod percentage;
mod pivot;
mod report;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: load, aggregate, and emit the report
  crate::report::run_report(&cfg)
}
