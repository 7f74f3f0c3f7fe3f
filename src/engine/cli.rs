//! CLI command handler: load config, crawl, report, persist.

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::pager::HttpPager;
use crate::pipeline::{check_crawl_opts, report_failures};
use crate::sink::{CrawlSink, SqliteSink};
use crate::utils::crawl_toml::{apply_file_to_opts, load_crawl_toml};
use crate::utils::{Colors, load_credentials, setup_logging};
use crate::{CrawlOpts, CrawlOutcome, Opts, crawl_follows};

/// Defaults < `.followcrawl.toml` in `dir` < command line.
pub fn resolve_opts(cli: &Cli, dir: &Path) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = load_crawl_toml(dir)? {
        apply_file_to_opts(&file, &mut opts);
    }
    cli.apply_to(&mut opts);
    Ok(opts)
}

fn print_summary(outcome: &CrawlOutcome) {
    info!(
        "{} | {} | {} | {} levels in {:.1}s",
        Colors::colorize(Colors::SEEN, &format!("Seen: {}", outcome.seen.len())),
        Colors::colorize(Colors::EDGES, &format!("Edges: {}", outcome.edges.len())),
        Colors::colorize(Colors::FAILED, &format!("Failed: {}", outcome.failures.len())),
        outcome.levels_completed,
        outcome.elapsed.as_secs_f64()
    );
}

/// Run one crawl from the command line and write the result.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let dir = Path::new(".");
    let opts = resolve_opts(cli, dir)?;
    setup_logging(opts.verbose);
    debug!("{:#?}", opts);

    let Some(seed) = opts.seed.clone() else {
        bail!("no seed given: pass SEED or set `seed` under [settings] in .followcrawl.toml");
    };
    let mut crawl_opts = CrawlOpts::from(&opts);
    check_crawl_opts(&crawl_opts)?;

    let credentials = load_credentials(dir)?;
    let pager = HttpPager::new(&opts.base_url, &credentials, opts.retries)?;

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    crawl_opts.cancel = Some(Arc::clone(&cancel_requested));

    let outcome = crawl_follows(&seed, &crawl_opts, &pager)?;
    print_summary(&outcome);
    report_failures(&outcome, opts.verbose);

    let mut sink = SqliteSink::new(&opts.output);
    sink.persist(&outcome)?;
    info!(
        "Wrote {} edges and {} failures to {}",
        outcome.edges.len(),
        outcome.failures.len(),
        sink.output().display()
    );
    if outcome.cancelled {
        warn!("Crawl cancelled by user; results are partial");
    }
    Ok(())
}
