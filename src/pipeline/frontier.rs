//! Frontier and shared crawl state.
//!
//! Everything workers and the coordinator share (frontier, seen set, next-level candidates,
//! gathered edges, failure log, remaining-worker count) sits behind one mutex paired with one
//! condition variable. Workers wait on it when the frontier is empty; the coordinator waits on
//! it for the level barrier and broadcasts on it when a new level is installed.
//!
//! [`CrawlCounters`] mirrors the sizes into atomics so reporters never need the lock.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::utils::config::DRAIN_POLL_INTERVAL;
use crate::{Edge, NodeId};

/// Lock-free mirror of the shared state sizes, refreshed inside every critical section.
#[derive(Debug, Default)]
pub struct CrawlCounters {
    seen: AtomicUsize,
    frontier: AtomicUsize,
    next_candidates: AtomicUsize,
    level: AtomicUsize,
    failures: AtomicUsize,
    idle_workers: AtomicUsize,
    processed: AtomicUsize,
}

impl CrawlCounters {
    pub fn seen(&self) -> usize {
        self.seen.load(Ordering::Relaxed)
    }

    pub fn frontier(&self) -> usize {
        self.frontier.load(Ordering::Relaxed)
    }

    pub fn next_candidates(&self) -> usize {
        self.next_candidates.load(Ordering::Relaxed)
    }

    pub fn level(&self) -> usize {
        self.level.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Workers that found the current level's frontier empty.
    pub fn idle_workers(&self) -> usize {
        self.idle_workers.load(Ordering::Relaxed)
    }

    /// Nodes fully handled (fetched or failed) so far.
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    pub(crate) fn node_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    fn publish(&self, st: &CrawlState, pool_size: usize) {
        self.seen.store(st.seen.len(), Ordering::Relaxed);
        self.frontier.store(st.frontier.len(), Ordering::Relaxed);
        self.next_candidates
            .store(st.next_candidates.len(), Ordering::Relaxed);
        self.level.store(st.level, Ordering::Relaxed);
        self.failures.store(st.failures.len(), Ordering::Relaxed);
        self.idle_workers.store(
            pool_size.saturating_sub(st.remaining_workers),
            Ordering::Relaxed,
        );
    }
}

/// Edges and candidate nodes a worker gathered during one level. Private to the worker until
/// it is merged at the end of the level.
#[derive(Debug, Default)]
pub struct LevelBuffer {
    pub edges: Vec<Edge>,
    pub found: HashSet<NodeId>,
}

impl LevelBuffer {
    /// Keep `edges` of `node` and note the far endpoint of each as a candidate.
    pub fn absorb(&mut self, node: &NodeId, edges: Vec<Edge>) {
        self.found
            .extend(edges.iter().map(|e| e.neighbor_of(node).clone()));
        self.edges.extend(edges);
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.found.is_empty()
    }

    fn take(&mut self) -> LevelBuffer {
        std::mem::take(self)
    }
}

/// Per-worker view of the level sequence. `generation` is the last level the worker joined;
/// `active` is false once it has reported the level drained.
#[derive(Debug, Default)]
pub(crate) struct WorkerCursor {
    generation: u64,
    active: bool,
}

/// Result of waiting on the level barrier.
#[derive(Debug, PartialEq, Eq)]
pub enum Drain {
    /// Every worker reported the level drained.
    Drained,
    /// The cancellation flag was raised first.
    Cancelled,
    /// A worker thread ended before the level drained (it panicked).
    WorkerLost,
}

#[derive(Debug, Default)]
struct CrawlState {
    frontier: Vec<NodeId>,
    seen: HashSet<NodeId>,
    next_candidates: HashSet<NodeId>,
    edges: Vec<Edge>,
    failures: Vec<NodeId>,
    remaining_workers: usize,
    level: usize,
    generation: u64,
    done: bool,
}

impl CrawlState {
    /// Pop a node not yet seen and mark it seen. Both happen under the caller's lock.
    fn claim_one(&mut self) -> Option<NodeId> {
        while let Some(node) = self.frontier.pop() {
            if self.seen.insert(node.clone()) {
                return Some(node);
            }
        }
        None
    }

    fn merge(&mut self, buffer: LevelBuffer) {
        self.next_candidates.extend(buffer.found);
        self.edges.extend(buffer.edges);
    }
}

/// Shared frontier handle. Only atomic claim/merge style operations are exposed; the
/// underlying sets are never handed out.
pub struct Frontier {
    state: Mutex<CrawlState>,
    cv: Condvar,
    counters: CrawlCounters,
    pool_size: usize,
}

impl Frontier {
    pub fn new(pool_size: usize) -> Self {
        Frontier {
            state: Mutex::new(CrawlState::default()),
            cv: Condvar::new(),
            counters: CrawlCounters::default(),
            pool_size,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, st: &CrawlState) {
        self.counters.publish(st, self.pool_size);
    }

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Current level (1-based once the seed is installed).
    pub fn level(&self) -> usize {
        self.lock().level
    }

    /// SEEDING: mark `seed` seen, keep its edges, and install its neighbors as level 1.
    /// Returns the size of the level 1 frontier.
    pub fn install_seed(&self, seed: &NodeId, edges: Vec<Edge>) -> usize {
        {
            let mut st = self.lock();
            st.seen.insert(seed.clone());
            let mut buffer = LevelBuffer::default();
            buffer.absorb(seed, edges);
            st.merge(buffer);
            self.publish(&st);
        }
        self.advance_level()
    }

    /// Remove one unseen node from the frontier and add it to seen, atomically.
    pub fn claim_one(&self) -> Option<NodeId> {
        let mut st = self.lock();
        let node = st.claim_one();
        self.publish(&st);
        node
    }

    /// Fold nodes discovered this level into the next level's candidates.
    pub fn merge_candidates(&self, found: HashSet<NodeId>) {
        self.merge_buffer(LevelBuffer {
            edges: Vec::new(),
            found,
        });
    }

    /// Fold a worker's whole level buffer (edges and candidates) into the shared state.
    pub fn merge_buffer(&self, buffer: LevelBuffer) {
        let mut st = self.lock();
        st.merge(buffer);
        self.publish(&st);
    }

    /// Append to the failure log.
    pub fn record_failure(&self, node: NodeId) {
        let mut st = self.lock();
        st.failures.push(node);
        self.publish(&st);
    }

    /// LEVEL_MERGED: candidates minus seen become the new frontier, the level counter moves
    /// on, every worker is counted active again and woken. Returns the new frontier size.
    pub fn advance_level(&self) -> usize {
        let mut st = self.lock();
        let candidates = std::mem::take(&mut st.next_candidates);
        let next: Vec<NodeId> = candidates
            .into_iter()
            .filter(|n| !st.seen.contains(n))
            .collect();
        let size = next.len();
        st.frontier = next;
        st.level += 1;
        st.generation += 1;
        st.remaining_workers = self.pool_size;
        self.publish(&st);
        self.cv.notify_all();
        size
    }

    /// LEVEL_DRAINING: block until every worker reports the level drained. Wakes every
    /// [`DRAIN_POLL_INTERVAL`] to check `cancel` and `workers_alive`.
    pub fn wait_for_drain<F>(&self, cancel: Option<&AtomicBool>, mut workers_alive: F) -> Drain
    where
        F: FnMut() -> bool,
    {
        let mut st = self.lock();
        loop {
            if st.remaining_workers == 0 {
                return Drain::Drained;
            }
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                return Drain::Cancelled;
            }
            if !workers_alive() {
                return Drain::WorkerLost;
            }
            st = self
                .cv
                .wait_timeout(st, DRAIN_POLL_INTERVAL)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
    }

    /// DONE: raise the done flag and wake everyone so workers exit.
    pub fn finish(&self) {
        let mut st = self.lock();
        st.done = true;
        self.publish(&st);
        self.cv.notify_all();
    }

    pub fn is_done(&self) -> bool {
        self.lock().done
    }

    /// Worker side of the loop: claim the next node, or report the level drained (merging
    /// `buffer`) and sleep until a new level starts. `None` once the crawl is done.
    pub(crate) fn next_claim(
        &self,
        cursor: &mut WorkerCursor,
        buffer: &mut LevelBuffer,
    ) -> Option<NodeId> {
        let mut st = self.lock();
        loop {
            if st.done {
                st.merge(buffer.take());
                self.publish(&st);
                return None;
            }
            if st.generation != cursor.generation {
                cursor.generation = st.generation;
                cursor.active = true;
            }
            if cursor.active {
                if let Some(node) = st.claim_one() {
                    self.publish(&st);
                    return Some(node);
                }
                st.merge(buffer.take());
                cursor.active = false;
                st.remaining_workers = st.remaining_workers.saturating_sub(1);
                self.publish(&st);
                if st.remaining_workers == 0 {
                    self.cv.notify_all();
                }
            }
            st = self.cv.wait(st).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the accumulated edges, failure log, and seen set. Call after every worker is joined.
    pub fn into_parts(self) -> (Vec<Edge>, Vec<NodeId>, HashSet<NodeId>) {
        let st = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        (st.edges, st.failures, st.seen)
    }
}
