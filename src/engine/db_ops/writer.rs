//! Crawl result writer: batched edge inserts, failure log, metadata, atomic file replace.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::sink::CrawlSink;
use crate::utils::config::DB_INSERT_BATCH_SIZE;
use crate::utils::TempOutput;
use crate::{CrawlOutcome, Edge};

use super::{INSERT_EDGE_SQL, INSERT_FAILURE_SQL, INSERT_META_SQL, open_db};

/// Insert a batch of edges in a single transaction. Returns batch length.
fn flush_batch(conn: &mut Connection, batch: &[Edge]) -> Result<usize> {
    let tx = conn.transaction().context("begin transaction")?;
    let mut stmt = tx.prepare(INSERT_EDGE_SQL).context("prepare insert")?;
    for e in batch {
        stmt.execute((e.source.as_str(), e.target.as_str()))
            .context("insert edge")?;
    }
    drop(stmt);
    tx.commit().context("commit transaction")?;
    Ok(batch.len())
}

fn meta_rows(outcome: &CrawlOutcome) -> Vec<(&'static str, String)> {
    vec![
        (
            "seed",
            outcome
                .seed
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default(),
        ),
        ("levels_completed", outcome.levels_completed.to_string()),
        ("seen_count", outcome.seen.len().to_string()),
        ("edge_count", outcome.edges.len().to_string()),
        ("failure_count", outcome.failures.len().to_string()),
        ("cancelled", outcome.cancelled.to_string()),
        ("elapsed_ms", outcome.elapsed.as_millis().to_string()),
    ]
}

/// Write edges (batched), failures, and metadata. Returns the number of edges written.
pub fn write_outcome(conn: &mut Connection, outcome: &CrawlOutcome) -> Result<usize> {
    let mut written = 0_usize;
    for batch in outcome.edges.chunks(DB_INSERT_BATCH_SIZE) {
        written += flush_batch(conn, batch)?;
    }

    let tx = conn.transaction().context("begin transaction")?;
    {
        let mut stmt = tx
            .prepare(INSERT_FAILURE_SQL)
            .context("prepare failure insert")?;
        for node in &outcome.failures {
            stmt.execute([node.as_str()]).context("insert failure")?;
        }
        let mut stmt = tx.prepare(INSERT_META_SQL).context("prepare meta insert")?;
        for (key, value) in meta_rows(outcome) {
            stmt.execute((key, value.as_str()))
                .context("insert meta")?;
        }
    }
    tx.commit().context("commit transaction")?;
    debug!(
        "wrote {} edges, {} failures",
        written,
        outcome.failures.len()
    );
    Ok(written)
}

/// SQLite output file. Writes into `<output>.tmp` and renames over `output` on success, so a
/// crash never leaves a half-written result at the final path.
#[derive(Clone, Debug)]
pub struct SqliteSink {
    output: PathBuf,
}

impl SqliteSink {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        SqliteSink {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl CrawlSink for SqliteSink {
    fn persist(&mut self, outcome: &CrawlOutcome) -> Result<()> {
        let target = TempOutput::for_output(&self.output);
        target.prepare()?;
        {
            let mut conn = open_db(target.temp_path())?;
            write_outcome(&mut conn, outcome)?;
            conn.close()
                .map_err(|(_, e)| e)
                .context("close output database")?;
        }
        target.commit()
    }
}
