//! Deterministic in-memory pager for crawl tests.

#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use followcrawl::utils::config::PAGE_SIZE;
use followcrawl::{Edge, NodeId, Page, Pager};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MockPager {
    follows: HashMap<NodeId, Vec<Edge>>,
    followers: HashMap<NodeId, Vec<Edge>>,
    failing: HashSet<NodeId>,
    failing_after_first: HashSet<NodeId>,
    totals: HashMap<NodeId, u64>,
    unresolvable: HashSet<String>,
    aliases: HashMap<String, NodeId>,
    latency: Option<Duration>,
    calls: Mutex<Vec<(NodeId, Option<String>)>>,
    resolves: Mutex<usize>,
}

impl MockPager {
    pub fn new() -> Self {
        Self::default()
    }

    /// `node` follows each of `targets`.
    pub fn follows(mut self, node: &str, targets: &[&str]) -> Self {
        let edges = targets.iter().map(|t| Edge::new(node, *t)).collect();
        self.follows.insert(NodeId::from(node), edges);
        self
    }

    /// `node` follows `count` generated targets `{prefix}0..{prefix}{count-1}`.
    pub fn follows_many(mut self, node: &str, prefix: &str, count: usize) -> Self {
        let edges = (0..count)
            .map(|i| Edge::new(node, format!("{prefix}{i}")))
            .collect();
        self.follows.insert(NodeId::from(node), edges);
        self
    }

    /// Each of `sources` follows `node`.
    pub fn followers(mut self, node: &str, sources: &[&str]) -> Self {
        let edges = sources.iter().map(|s| Edge::new(*s, node)).collect();
        self.followers.insert(NodeId::from(node), edges);
        self
    }

    /// Every page of `node` fails.
    pub fn failing(mut self, node: &str) -> Self {
        self.failing.insert(NodeId::from(node));
        self
    }

    /// The first page of `node` works, later pages fail.
    pub fn failing_after_first_page(mut self, node: &str) -> Self {
        self.failing_after_first.insert(NodeId::from(node));
        self
    }

    /// Report `total` for `node` instead of its real edge count.
    pub fn with_total(mut self, node: &str, total: u64) -> Self {
        self.totals.insert(NodeId::from(node), total);
        self
    }

    pub fn unresolvable(mut self, name: &str) -> Self {
        self.unresolvable.insert(name.to_string());
        self
    }

    pub fn alias(mut self, name: &str, id: &str) -> Self {
        self.aliases.insert(name.to_string(), NodeId::from(id));
        self
    }

    /// Sleep this long inside every page fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every page request so far, in call order.
    pub fn calls(&self) -> Vec<(NodeId, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Nodes whose first page was requested, in call order.
    pub fn first_page_order(&self) -> Vec<NodeId> {
        self.calls()
            .into_iter()
            .filter(|(_, cursor)| cursor.is_none())
            .map(|(node, _)| node)
            .collect()
    }

    pub fn resolve_count(&self) -> usize {
        *self.resolves.lock().unwrap()
    }

    fn page_of(&self, edges: Option<&Vec<Edge>>, node: &NodeId, cursor: Option<&str>) -> Result<Page> {
        self.calls
            .lock()
            .unwrap()
            .push((node.clone(), cursor.map(str::to_string)));
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        if self.failing.contains(node) {
            bail!("mock failure for {node}");
        }
        let offset: usize = match cursor {
            Some(c) => c.parse().map_err(|_| anyhow!("bad cursor {c}"))?,
            None => 0,
        };
        if offset > 0 && self.failing_after_first.contains(node) {
            bail!("mock failure for {node} at offset {offset}");
        }
        let all = edges.map(Vec::as_slice).unwrap_or(&[]);
        let end = (offset + PAGE_SIZE).min(all.len());
        let page: Vec<Edge> = all.get(offset..end).unwrap_or(&[]).to_vec();
        let next_cursor = (end < all.len()).then(|| end.to_string());
        let total = self
            .totals
            .get(node)
            .copied()
            .unwrap_or(all.len() as u64);
        Ok(Page {
            edges: page,
            next_cursor,
            total,
        })
    }
}

impl Pager for MockPager {
    fn fetch_page(&self, node: &NodeId, cursor: Option<&str>) -> Result<Page> {
        self.page_of(self.follows.get(node), node, cursor)
    }

    fn fetch_followers_page(&self, node: &NodeId, cursor: Option<&str>) -> Result<Page> {
        self.page_of(self.followers.get(node), node, cursor)
    }

    fn resolve_seed(&self, name: &str) -> Result<NodeId> {
        *self.resolves.lock().unwrap() += 1;
        if self.unresolvable.contains(name) {
            bail!("no such user {name}");
        }
        Ok(self
            .aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| NodeId::from(name)))
    }
}

/// Graph of `n` nodes `n0..n{n-1}` full of cycles: `n{i}` follows `n{(7i + k) % n}` for k in 1..=3.
pub fn ring_pager(n: usize) -> MockPager {
    let mut pager = MockPager::new();
    for i in 0..n {
        let targets: Vec<String> = (1..=3).map(|k| format!("n{}", (i * 7 + k) % n)).collect();
        let refs: Vec<&str> = targets.iter().map(String::as_str).collect();
        pager = pager.follows(&format!("n{i}"), &refs);
    }
    pager
}

/// Plain single-threaded BFS over `pager`'s follows, fetching nodes up to distance `depth`.
/// Returns the edges gathered and the distance of every node discovered.
pub fn reference_bfs(
    pager: &MockPager,
    seed: &str,
    depth: usize,
) -> (HashSet<Edge>, HashMap<NodeId, usize>) {
    let mut levels: HashMap<NodeId, usize> = HashMap::new();
    let mut edges = HashSet::new();
    let mut queue = VecDeque::new();
    let seed = NodeId::from(seed);
    levels.insert(seed.clone(), 0);
    queue.push_back(seed);
    while let Some(node) = queue.pop_front() {
        let level = levels[&node];
        if level > depth {
            continue;
        }
        let mut cursor: Option<String> = None;
        loop {
            let Ok(page) = pager.fetch_page(&node, cursor.as_deref()) else {
                break;
            };
            for e in &page.edges {
                edges.insert(e.clone());
                if !levels.contains_key(&e.target) {
                    levels.insert(e.target.clone(), level + 1);
                    queue.push_back(e.target.clone());
                }
            }
            match page.next_cursor {
                Some(c) if !page.edges.is_empty() => cursor = Some(c),
                _ => break,
            }
        }
    }
    (edges, levels)
}

pub fn edge_set(edges: &[Edge]) -> HashSet<Edge> {
    edges.iter().cloned().collect()
}

pub fn node_set(nodes: &[NodeId]) -> HashSet<NodeId> {
    nodes.iter().cloned().collect()
}
