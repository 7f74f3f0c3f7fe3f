//! Periodic crawl stats, read from [`CrawlCounters`] without taking the frontier lock.

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::info;
use std::fmt;
use std::time::{Duration, Instant};

use crate::engine::tools::time_per_node;

use super::frontier::CrawlCounters;

/// Best-effort view of crawl progress. Fields are read one by one, so they may disagree slightly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlSnapshot {
    pub seen: usize,
    pub frontier: usize,
    pub next_candidates: usize,
    pub level: usize,
    pub processed: usize,
    pub failures: usize,
    pub elapsed: Duration,
}

impl CrawlSnapshot {
    pub fn capture(counters: &CrawlCounters, start: Instant) -> Self {
        CrawlSnapshot {
            seen: counters.seen(),
            frontier: counters.frontier(),
            next_candidates: counters.next_candidates(),
            level: counters.level(),
            processed: counters.processed(),
            failures: counters.failures(),
            elapsed: start.elapsed(),
        }
    }
}

impl fmt::Display for CrawlSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} | seen {} | frontier {} | next {} | failed {} | elapsed {:.1}s | {:.0?}/node",
            self.level,
            self.seen,
            self.frontier,
            self.next_candidates,
            self.failures,
            self.elapsed.as_secs_f64(),
            time_per_node(self.elapsed, self.processed),
        )
    }
}

/// Log a snapshot every `interval` until `stop_rx` is disconnected (or receives).
pub fn run_stats_reporter(
    counters: &CrawlCounters,
    start: Instant,
    interval: Duration,
    stop_rx: Receiver<()>,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                info!("{}", CrawlSnapshot::capture(counters, start));
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
