//! followcrawl CLI: crawl a follows graph from a seed and write it to SQLite.

use anyhow::Result;
use clap::Parser;
use followcrawl::engine::arg_parser::Cli;
use followcrawl::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
