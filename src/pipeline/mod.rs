//! Crawl pipeline: frontier, workers, level coordinator, pacing, stats, failure summary.

pub mod error_handler;
pub mod frontier;
pub mod governor;
pub mod orchestrator;
pub mod stats;
pub mod worker;

pub use error_handler::report_failures;
pub use frontier::{CrawlCounters, Drain, Frontier, LevelBuffer};
pub use governor::RateGovernor;
pub use orchestrator::{CrawlPlan, check_crawl_opts, run_crawl};
pub use stats::{CrawlSnapshot, run_stats_reporter};
