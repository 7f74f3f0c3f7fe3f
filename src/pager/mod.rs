//! Pager: one page of follow edges at a time, plus the per-node pagination loop.

pub mod http;

pub use http::{HttpPager, parse_page, parse_user_id};

use anyhow::{Result, bail};
use log::debug;

use crate::engine::tools::pages_remaining;
use crate::utils::config::PAGE_SIZE;
use crate::{Direction, Edge, NodeId};

/// One page of edges for a node.
#[derive(Clone, Debug, Default)]
pub struct Page {
    /// At most [`PAGE_SIZE`] edges.
    pub edges: Vec<Edge>,
    /// `None` when there are no further pages.
    pub next_cursor: Option<String>,
    /// Edge count reported by the API. Best-effort; may be stale.
    pub total: u64,
}

/// Source of paginated follow edges. Implementations do their own retrying and return `Err`
/// only once a page is given up on.
pub trait Pager: Send + Sync {
    /// Page of everyone `node` follows. `cursor` is `None` for the first page.
    fn fetch_page(&self, node: &NodeId, cursor: Option<&str>) -> Result<Page>;

    /// Page of everyone following `node`.
    fn fetch_followers_page(&self, node: &NodeId, _cursor: Option<&str>) -> Result<Page> {
        bail!("pager cannot list followers (node {node})")
    }

    /// Resolve a seed name to a node id. Default: the name is the id.
    fn resolve_seed(&self, name: &str) -> Result<NodeId> {
        Ok(NodeId::from(name))
    }
}

/// Outcome of paginating one node.
#[derive(Debug)]
pub enum PageFetch {
    /// Every page fetched (or the API reported no more data).
    Complete(Vec<Edge>),
    /// Some pages fetched, then a page failed. `edges` are kept.
    Partial { edges: Vec<Edge>, error: anyhow::Error },
    /// The first page failed; nothing gathered.
    Failed(anyhow::Error),
}

impl PageFetch {
    /// Split into gathered edges and the error that stopped paging, if any.
    pub fn into_parts(self) -> (Vec<Edge>, Option<anyhow::Error>) {
        match self {
            PageFetch::Complete(edges) => (edges, None),
            PageFetch::Partial { edges, error } => (edges, Some(error)),
            PageFetch::Failed(error) => (Vec::new(), Some(error)),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PageFetch::Complete(_))
    }
}

/// Fetch every page of `node` in `direction`. `before_call` runs before each request (pacing).
///
/// The page count is bounded by the first page's `total`; an empty page ends the node early
/// whatever `total` said.
pub fn fetch_all_pages<P, F>(
    pager: &P,
    node: &NodeId,
    direction: Direction,
    mut before_call: F,
) -> PageFetch
where
    P: Pager + ?Sized,
    F: FnMut(),
{
    let fetch = |cursor: Option<&str>| match direction {
        Direction::Follows => pager.fetch_page(node, cursor),
        Direction::Followers => pager.fetch_followers_page(node, cursor),
    };

    before_call();
    let first = match fetch(None) {
        Ok(page) => page,
        Err(error) => return PageFetch::Failed(error),
    };
    if first.edges.is_empty() {
        return PageFetch::Complete(Vec::new());
    }

    let pages_left = pages_remaining(first.total, PAGE_SIZE);
    let mut edges = first.edges;
    let mut cursor = first.next_cursor;
    for _ in 0..pages_left {
        let Some(c) = cursor.take() else {
            break;
        };
        before_call();
        match fetch(Some(c.as_str())) {
            Ok(page) => {
                if page.edges.is_empty() {
                    break;
                }
                edges.extend(page.edges);
                cursor = page.next_cursor;
            }
            Err(error) => return PageFetch::Partial { edges, error },
        }
    }
    debug!("{}: {} edges ({:?})", node, edges.len(), direction);
    PageFetch::Complete(edges)
}
