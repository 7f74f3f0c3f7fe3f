//! Database operations: schema, open/load, crawl result writer.

mod connection;
mod writer;

pub use connection::{load_edges, load_failures, load_meta, open_db, open_db_in_memory};
pub use writer::{SqliteSink, write_outcome};

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Insert statement for edges table.
pub(crate) const INSERT_EDGE_SQL: &str = "INSERT INTO edges (source, target) VALUES (?1, ?2)";

/// Insert statement for failures table.
pub(crate) const INSERT_FAILURE_SQL: &str = "INSERT OR IGNORE INTO failures (node) VALUES (?1)";

/// Insert statement for crawl_meta table.
pub(crate) const INSERT_META_SQL: &str =
    "INSERT OR REPLACE INTO crawl_meta (key, value) VALUES (?1, ?2)";

/// Schema for edges, failures and crawl_meta tables.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS edges (
    source TEXT NOT NULL,
    target TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source);

CREATE TABLE IF NOT EXISTS failures (
    node TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS crawl_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
