//! Level coordinator: seed, run the worker pool level by level, stop at depth or when the
//! frontier runs dry.

use anyhow::{Context, Result, bail};
use crossbeam_channel::bounded;
use log::{debug, error, info, warn};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Instant;

use crate::engine::progress::{finish_progress, setup_progress};
use crate::pager::{Pager, fetch_all_pages};
use crate::{CrawlOpts, CrawlOutcome};

use super::frontier::{Drain, Frontier};
use super::governor::RateGovernor;
use super::stats::{CrawlSnapshot, run_stats_reporter};
use super::worker::worker_loop;

/// Validated crawl shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrawlPlan {
    pub depth: usize,
    pub pool_size: usize,
}

/// Reject bad configuration before any request is made or thread started.
pub fn check_crawl_opts(opts: &CrawlOpts) -> Result<CrawlPlan> {
    if opts.depth < 0 {
        bail!("invalid depth {}: must be 0 or more", opts.depth);
    }
    if opts.pool_size == 0 {
        bail!("invalid pool size 0: must be at least 1");
    }
    let depth = usize::try_from(opts.depth).context("depth out of range")?;
    Ok(CrawlPlan {
        depth,
        pool_size: opts.pool_size,
    })
}

/// How the level loop ended.
#[derive(Debug, Default)]
struct LevelRun {
    levels_completed: usize,
    cancelled: bool,
}

/// Resolve the seed, fetch its edges, then crawl `opts.depth` levels out from it.
///
/// Per-node failures end up in [`CrawlOutcome::failures`]; only bad options, an unresolvable
/// seed, a seed whose first page cannot be fetched, or a panicking worker return `Err`.
pub fn run_crawl<P>(seed_name: &str, opts: &CrawlOpts, pager: &P) -> Result<CrawlOutcome>
where
    P: Pager + ?Sized,
{
    let plan = check_crawl_opts(opts)?;
    let start = Instant::now();

    let seed = pager
        .resolve_seed(seed_name)
        .with_context(|| format!("resolve seed {seed_name}"))?;
    info!("Seed {} resolved to {}", seed_name, seed);
    if plan.depth == 0 {
        debug!("Depth 0: nothing to crawl");
        return Ok(CrawlOutcome {
            elapsed: start.elapsed(),
            ..CrawlOutcome::seed_only(seed)
        });
    }

    let frontier = Frontier::new(plan.pool_size);
    let (seed_edges, seed_error) =
        fetch_all_pages(pager, &seed, opts.seed_direction, || {}).into_parts();
    if let Some(e) = seed_error {
        if seed_edges.is_empty() {
            return Err(e.context(format!("fetch edges of seed {seed}")));
        }
        warn!(
            "Seed {} only partly fetched ({} edges): {:#}",
            seed,
            seed_edges.len(),
            e
        );
        frontier.record_failure(seed.clone());
    }
    let first_level = frontier.install_seed(&seed, seed_edges);
    info!("Level 1: {} nodes", first_level);

    let run = if first_level == 0 {
        info!("Seed has no neighbors; done");
        LevelRun::default()
    } else {
        run_levels(&frontier, pager, opts, &plan, start)?
    };

    let (edges, failures, seen) = frontier.into_parts();
    Ok(CrawlOutcome {
        seed: Some(seed),
        edges,
        failures,
        seen,
        levels_completed: run.levels_completed,
        cancelled: run.cancelled,
        elapsed: start.elapsed(),
    })
}

/// Start the pool (and reporter), then loop: wait for the level barrier, stop or install the
/// next level. Workers are reused across levels and joined once at the end.
fn run_levels<P>(
    frontier: &Frontier,
    pager: &P,
    opts: &CrawlOpts,
    plan: &CrawlPlan,
    start: Instant,
) -> Result<LevelRun>
where
    P: Pager + ?Sized,
{
    let governor = RateGovernor::new(plan.pool_size, opts.delay_unit);
    let progress = setup_progress(opts.progress);
    let cancel = opts.cancel.as_deref();
    let is_cancelled = || cancel.is_some_and(|c| c.load(Ordering::Relaxed));
    let (stop_tx, stop_rx) = bounded::<()>(0);

    let run = thread::scope(|s| -> Result<LevelRun> {
        let reporter = opts.stats_interval.map(|interval| {
            let counters = frontier.counters();
            s.spawn(move || run_stats_reporter(counters, start, interval, stop_rx))
        });
        let governor = &governor;
        let progress = progress.as_ref();
        let workers: Vec<_> = (0..plan.pool_size)
            .map(|id| s.spawn(move || worker_loop(id, frontier, pager, governor, progress)))
            .collect();
        debug!("Started {} workers", workers.len());

        let mut run = LevelRun::default();
        loop {
            let level = frontier.level();
            match frontier.wait_for_drain(cancel, || workers.iter().all(|h| !h.is_finished())) {
                Drain::Drained => {
                    run.levels_completed = level;
                    debug!("{}", CrawlSnapshot::capture(frontier.counters(), start));
                }
                Drain::Cancelled => {
                    warn!("Cancelled during level {}; keeping partial results", level);
                    run.cancelled = true;
                    break;
                }
                Drain::WorkerLost => {
                    error!("A worker stopped during level {}", level);
                    break;
                }
            }
            if level >= plan.depth {
                info!("Reached depth {}", plan.depth);
                break;
            }
            if is_cancelled() {
                warn!("Cancelled after level {}", level);
                run.cancelled = true;
                break;
            }
            let next = frontier.advance_level();
            if next == 0 {
                info!("Frontier exhausted after level {}", level);
                break;
            }
            info!("Level {}: {} nodes", level + 1, next);
        }

        frontier.finish();
        drop(stop_tx);
        let panicked = workers
            .into_iter()
            .map(|h| h.join())
            .filter(|r| r.is_err())
            .count();
        if let Some(reporter) = reporter {
            let _ = reporter.join();
        }
        if panicked > 0 {
            bail!("{} worker thread(s) panicked", panicked);
        }
        Ok(run)
    })?;

    finish_progress(progress.as_ref());
    Ok(run)
}
