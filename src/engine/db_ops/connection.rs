//! Open and load the crawl output database.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

use crate::{Edge, NodeId};

use super::{SCHEMA, WAL_PRAGMAS};

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(())
}

/// Open or create the output DB and ensure schema + WAL.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("open database {}", path.display()))?;
    apply_wal_and_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory DB with the same schema (no WAL pragmas needed).
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory database")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(conn)
}

/// All stored edges, in insertion order.
pub fn load_edges(conn: &Connection) -> Result<Vec<Edge>> {
    let mut stmt = conn.prepare("SELECT source, target FROM edges ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| {
        let source: String = row.get(0)?;
        let target: String = row.get(1)?;
        Ok(Edge::new(source, target))
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("load edges")
}

/// All failed nodes, in insertion order.
pub fn load_failures(conn: &Connection) -> Result<Vec<NodeId>> {
    let mut stmt = conn.prepare("SELECT node FROM failures ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0).map(NodeId::from))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("load failures")
}

/// Crawl metadata as key → value.
pub fn load_meta(conn: &Connection) -> Result<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT key, value FROM crawl_meta")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    let mut map = HashMap::new();
    for row in rows {
        let (k, v) = row?;
        map.insert(k, v);
    }
    Ok(map)
}
