use log::{debug, warn};

use crate::Direction;
use crate::engine::progress::{ProgressBar, update_progress_bar};
use crate::pager::{Pager, fetch_all_pages};

use super::frontier::{Frontier, LevelBuffer, WorkerCursor};
use super::governor::RateGovernor;

/// Single crawl worker: claim a node, page through everything it follows (paced by the
/// governor, no lock held), keep the result in a private buffer, repeat. The buffer is merged
/// when the worker finds the level drained. Returns once the frontier reports done.
pub(crate) fn worker_loop<P>(
    id: usize,
    frontier: &Frontier,
    pager: &P,
    governor: &RateGovernor,
    progress: Option<&ProgressBar>,
) where
    P: Pager + ?Sized,
{
    let mut cursor = WorkerCursor::default();
    let mut buffer = LevelBuffer::default();
    let counters = frontier.counters();

    while let Some(node) = frontier.next_claim(&mut cursor, &mut buffer) {
        let fetch = fetch_all_pages(pager, &node, Direction::Follows, || {
            governor.pace(counters.idle_workers())
        });
        let (edges, error) = fetch.into_parts();
        if let Some(e) = error {
            warn!(
                "worker {}: node {} failed after {} edges: {:#}",
                id,
                node,
                edges.len(),
                e
            );
            frontier.record_failure(node.clone());
        }
        buffer.absorb(&node, edges);
        counters.node_processed();
        if let Some(pb) = progress {
            update_progress_bar(pb, 1);
        }
    }
    debug!("worker {} exiting", id);
}
