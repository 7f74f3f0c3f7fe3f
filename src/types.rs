//! Public and internal types for the followcrawl API and pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::utils::config::CrawlDefaults;

/// Opaque identifier of a graph vertex (user/channel). Compared and hashed by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

/// `source` follows `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The endpoint on the other side of `node`. For a self-loop this is `node` itself.
    pub fn neighbor_of(&self, node: &NodeId) -> &NodeId {
        if &self.source == node {
            &self.target
        } else {
            &self.source
        }
    }
}

/// Which side of the follow relation a page lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Everyone `node` follows: edges `(node, x)`.
    #[default]
    Follows,
    /// Everyone following `node`: edges `(x, node)`.
    Followers,
}

/// Lib-only options for [`crawl_follows`](crate::crawl_follows).
#[derive(Clone, Debug)]
pub struct CrawlOpts {
    /// Number of BFS levels to expand past the seed. Negative values are rejected.
    pub depth: i64,
    /// Fixed worker pool size. Must be positive.
    pub pool_size: usize,
    /// Direction used to build the first frontier from the seed. Workers always expand [`Direction::Follows`].
    pub seed_direction: Direction,
    /// Time unit of the rate governor: a fully idle pool sleeps one unit before each fetch.
    pub delay_unit: Duration,
    /// Stats snapshot interval. `None` disables the reporter thread.
    pub stats_interval: Option<Duration>,
    /// Show a kdam counter of processed nodes.
    pub progress: bool,
    /// Global cancellation flag (e.g. set from a Ctrl+C handler). Checked at loop boundaries.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for CrawlOpts {
    fn default() -> Self {
        CrawlOpts {
            depth: CrawlDefaults::DEPTH,
            pool_size: CrawlDefaults::POOL_SIZE,
            seed_direction: Direction::Follows,
            delay_unit: Duration::from_millis(CrawlDefaults::DELAY_UNIT_MS),
            stats_interval: Some(Duration::from_secs(CrawlDefaults::STATS_INTERVAL_SECS)),
            progress: false,
            cancel: None,
        }
    }
}

impl From<&Opts> for CrawlOpts {
    fn from(o: &Opts) -> Self {
        CrawlOpts {
            depth: o.depth,
            pool_size: o.pool_size,
            seed_direction: if o.followers_seed {
                Direction::Followers
            } else {
                Direction::Follows
            },
            delay_unit: Duration::from_millis(o.delay_unit_ms),
            stats_interval: (o.stats_interval_secs > 0)
                .then(|| Duration::from_secs(o.stats_interval_secs)),
            progress: o.progress,
            cancel: None,
        }
    }
}

/// Full options (CLI). Use [`CrawlOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Seed login name (or id, with a pager that resolves ids to themselves).
    pub seed: Option<String>,
    pub depth: i64,
    pub pool_size: usize,
    /// Build the first frontier from the seed's followers instead of its follows.
    pub followers_seed: bool,
    /// SQLite output path.
    pub output: PathBuf,
    /// Seconds between stats snapshots; 0 disables.
    pub stats_interval_secs: u64,
    /// Rate governor time unit in milliseconds.
    pub delay_unit_ms: u64,
    /// Base URL of the follows API.
    pub base_url: String,
    /// Extra attempts per page before the page counts as failed.
    pub retries: u32,
    pub verbose: bool,
    pub progress: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            seed: None,
            depth: CrawlDefaults::DEPTH,
            pool_size: CrawlDefaults::POOL_SIZE,
            followers_seed: false,
            output: PathBuf::from(crate::utils::config::PackagePaths::get().output_filename()),
            stats_interval_secs: CrawlDefaults::STATS_INTERVAL_SECS,
            delay_unit_ms: CrawlDefaults::DELAY_UNIT_MS,
            base_url: CrawlDefaults::BASE_URL.to_string(),
            retries: CrawlDefaults::RETRIES,
            verbose: false,
            progress: false,
        }
    }
}

/// Everything the crawl gathered. Handed to a [`CrawlSink`](crate::sink::CrawlSink) once at the end.
#[derive(Clone, Debug, Default)]
pub struct CrawlOutcome {
    pub seed: Option<NodeId>,
    /// All edges gathered, seed edges included. Order is not meaningful.
    pub edges: Vec<Edge>,
    /// Nodes whose fetch failed (fully or part way). Each node appears at most once.
    pub failures: Vec<NodeId>,
    /// Every node claimed for processing, seed included.
    pub seen: HashSet<NodeId>,
    /// BFS levels fully drained (seeding not counted).
    pub levels_completed: usize,
    /// True when the crawl stopped on the cancellation flag.
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl CrawlOutcome {
    /// Result of a depth-0 crawl: the seed is resolved, nothing is fetched.
    pub fn seed_only(seed: NodeId) -> Self {
        CrawlOutcome {
            seed: Some(seed),
            ..Default::default()
        }
    }
}
