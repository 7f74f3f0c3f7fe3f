//! Engine module: CLI, progress, persistence, helpers

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_opts};
pub use db_ops::{
    SqliteSink, load_edges, load_failures, load_meta, open_db, open_db_in_memory, write_outcome,
};
pub use tools::{pages_remaining, time_per_node};
