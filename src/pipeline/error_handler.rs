use log::{info, warn};

use crate::CrawlOutcome;
use crate::utils::config::FAILURE_LIST_THRESHOLD;

/// Log the failure log summary; when `verbose`, list failed nodes (up to a threshold).
/// Call after the crawl returns.
pub fn report_failures(outcome: &CrawlOutcome, verbose: bool) {
    let failed = outcome.failures.len();
    if failed == 0 {
        info!("No fetch failures");
        return;
    }
    warn!(
        "{} of {} nodes could not be fully fetched",
        failed,
        outcome.seen.len()
    );
    if verbose {
        for node in outcome.failures.iter().take(FAILURE_LIST_THRESHOLD) {
            eprintln!("  failed: {}", node);
        }
        if failed > FAILURE_LIST_THRESHOLD {
            eprintln!("  ... and {} more", failed - FAILURE_LIST_THRESHOLD);
        }
    }
}
