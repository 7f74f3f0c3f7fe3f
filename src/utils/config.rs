//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    db_filename: String,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                db_filename: format!("{pkg}.db"),
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    /// Default SQLite output file name.
    pub fn output_filename(&self) -> &str {
        &self.db_filename
    }

    /// Per-directory config file name (e.g. `.followcrawl.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for `suffix`, e.g. `FOLLOWCRAWL_CLIENT_ID`.
    pub fn env_key(&self, suffix: &str) -> String {
        format!("{}_{}", self.env_prefix, suffix)
    }
}

// ---- Crawl defaults ----

/// Defaults shared by [`CrawlOpts`](crate::CrawlOpts), [`Opts`](crate::Opts) and the CLI.
pub struct CrawlDefaults;

impl CrawlDefaults {
    pub const DEPTH: i64 = 1;
    pub const POOL_SIZE: usize = 13;
    pub const STATS_INTERVAL_SECS: u64 = 10;
    pub const DELAY_UNIT_MS: u64 = 1000;
    pub const RETRIES: u32 = 1;
    pub const BASE_URL: &'static str = "https://api.twitch.tv/helix";
}

// ---- Paging ----

/// Edges per page, fixed by the upstream API.
pub const PAGE_SIZE: usize = 100;

/// HTTP pager timeouts and backoff.
pub struct HttpConsts;

impl HttpConsts {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    /// Sleep before retry `n` is `n * RETRY_BACKOFF`.
    pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);
}

// ---- Coordination ----

/// How often the coordinator re-checks cancellation and worker liveness while draining a level.
pub const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(200);

// ---- Database ----

/// Batch size for DB insert chunks (balance transaction size vs round-trips).
pub const DB_INSERT_BATCH_SIZE: usize = 1000;

/// When verbose, list at most this many failed nodes in the summary.
pub const FAILURE_LIST_THRESHOLD: usize = 100;
