pub mod config;
pub mod crawl_toml;
pub mod credentials;
pub mod logger;
pub mod tempfiles;

pub use config::*;
pub use credentials::{ApiCredentials, load_credentials};
pub use logger::{Colors, setup_logging};
pub use tempfiles::TempOutput;
