//! Persistence of a finished crawl.

use anyhow::Result;

use crate::CrawlOutcome;

/// Receives the final edge list and failure log. Invoked exactly once, after the crawl ends.
pub trait CrawlSink {
    fn persist(&mut self, outcome: &CrawlOutcome) -> Result<()>;
}

pub use crate::engine::db_ops::SqliteSink;
