//! followcrawl: concurrent, depth-bounded BFS over a paginated follows graph

pub mod engine;
pub mod pager;
pub mod pipeline;
pub mod sink;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;

pub use pager::{Page, PageFetch, Pager};
pub use sink::CrawlSink;

/// Result alias used by public followcrawl API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: resolve `seed` through `pager`, then crawl `opts.depth` levels outward.
///
/// - **Depth 0** → the seed is resolved and nothing else is fetched.
/// - **Depth n** → the seed's edges (in `opts.seed_direction`) form level 1; each level's
///   nodes are expanded along [`Direction::Follows`] by a pool of `opts.pool_size` threads.
///
/// Per-node fetch failures do not fail the crawl; they are listed in
/// [`CrawlOutcome::failures`]. Persist the outcome with a [`CrawlSink`].
///
/// ```ignore
/// let pager = followcrawl::pager::HttpPager::new(base_url, &creds, 1)?;
/// let opts = CrawlOpts { depth: 2, ..Default::default() };
/// let outcome = followcrawl::crawl_follows("some_channel", &opts, &pager)?;
/// ```
pub fn crawl_follows<P>(seed: &str, opts: &CrawlOpts, pager: &P) -> Result<CrawlOutcome>
where
    P: Pager + ?Sized,
{
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    pipeline::run_crawl(seed, opts, pager)
}
