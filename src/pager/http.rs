//! Blocking HTTP pager for a Helix-style follows API.
//!
//! `GET {base}/users/follows?from_id=..&first=100[&after=cursor]` (or `to_id=` for followers)
//! returns `{"data": [{"from_id", "to_id", ..}], "pagination": {"cursor"}, "total"}`.
//! `GET {base}/users?login=..` resolves a seed name.

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::thread;

use crate::pager::{Page, Pager};
use crate::utils::ApiCredentials;
use crate::utils::config::{HttpConsts, PAGE_SIZE};
use crate::{Edge, NodeId};

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(default)]
    data: Vec<WireEdge>,
    #[serde(default)]
    pagination: WirePagination,
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct WireEdge {
    from_id: String,
    to_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct WirePagination {
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsers {
    #[serde(default)]
    data: Vec<WireUser>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
}

/// Decode one follows page. An empty `data` array yields an empty page with no cursor.
pub fn parse_page(body: &str) -> Result<Page> {
    let wire: WirePage = serde_json::from_str(body).context("decode follows page")?;
    if wire.data.is_empty() {
        return Ok(Page {
            edges: Vec::new(),
            next_cursor: None,
            total: wire.total,
        });
    }
    let edges = wire
        .data
        .into_iter()
        .map(|e| Edge::new(e.from_id, e.to_id))
        .collect();
    Ok(Page {
        edges,
        next_cursor: wire.pagination.cursor.filter(|c| !c.is_empty()),
        total: wire.total,
    })
}

/// Decode a users lookup and return the first user's id.
pub fn parse_user_id(body: &str) -> Result<NodeId> {
    let wire: WireUsers = serde_json::from_str(body).context("decode users lookup")?;
    wire.data
        .into_iter()
        .next()
        .map(|u| NodeId::from(u.id))
        .ok_or_else(|| anyhow!("users lookup returned no match"))
}

pub struct HttpPager {
    client: Client,
    base_url: String,
    retries: u32,
}

impl HttpPager {
    pub fn new(base_url: &str, credentials: &ApiCredentials, retries: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Client-ID",
            HeaderValue::from_str(&credentials.client_id).context("invalid client id header")?,
        );
        let mut auth =
            HeaderValue::from_str(&credentials.auth_token).context("invalid auth token header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(HttpConsts::REQUEST_TIMEOUT)
            .build()
            .context("build HTTP client")?;
        Ok(HttpPager {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retries,
        })
    }

    fn get_once(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);
        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?
            .text()
            .with_context(|| format!("read body of {url}"))?;
        Ok(body)
    }

    /// GET with up to `retries` extra attempts and linear backoff.
    fn get_with_retries(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.get_once(path, query) {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    debug!("retry {}/{} after: {:#}", attempt, self.retries, e);
                    thread::sleep(HttpConsts::RETRY_BACKOFF * attempt);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn follows_page(&self, key: &str, node: &NodeId, cursor: Option<&str>) -> Result<Page> {
        let first = PAGE_SIZE.to_string();
        let mut query = vec![(key, node.as_str()), ("first", first.as_str())];
        if let Some(c) = cursor {
            query.push(("after", c));
        }
        let body = self.get_with_retries("users/follows", &query)?;
        parse_page(&body).with_context(|| format!("node {node}, cursor {cursor:?}"))
    }
}

impl Pager for HttpPager {
    fn fetch_page(&self, node: &NodeId, cursor: Option<&str>) -> Result<Page> {
        self.follows_page("from_id", node, cursor)
    }

    fn fetch_followers_page(&self, node: &NodeId, cursor: Option<&str>) -> Result<Page> {
        self.follows_page("to_id", node, cursor)
    }

    fn resolve_seed(&self, name: &str) -> Result<NodeId> {
        let body = self
            .get_with_retries("users", &[("login", name)])
            .with_context(|| format!("look up user {name}"))?;
        parse_user_id(&body).with_context(|| format!("look up user {name}"))
    }
}
