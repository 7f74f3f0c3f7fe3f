//! Load `.followcrawl.toml` from a directory (CLI only). Lib callers pass [`CrawlOpts`](crate::CrawlOpts) directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct CrawlToml {
    #[serde(default)]
    settings: CrawlSection,
}

#[derive(Debug, Default, Deserialize)]
struct CrawlSection {
    seed: Option<String>,
    depth: Option<i64>,
    pool_size: Option<usize>,
    followers_seed: Option<bool>,
    output: Option<String>,
    stats_interval: Option<u64>,
    delay_unit_ms: Option<u64>,
    base_url: Option<String>,
    retries: Option<u32>,
    verbose: Option<bool>,
    progress: Option<bool>,
}

/// Parse config text.
pub fn parse_crawl_toml(s: &str) -> Result<CrawlToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the config file from `dir`. `Ok(None)` when there is no file; an unreadable or
/// invalid file is an error.
pub fn load_crawl_toml(dir: &Path) -> Result<Option<CrawlToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    let file = parse_crawl_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &CrawlToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref s) = sec.seed {
        opts.seed = Some(s.clone());
    }
    if let Some(ref p) = sec.output {
        opts.output = PathBuf::from(p);
    }
    apply_file_opt!(sec, opts, depth => depth);
    apply_file_opt!(sec, opts, pool_size => pool_size);
    apply_file_opt!(sec, opts, followers_seed => followers_seed);
    apply_file_opt!(sec, opts, stats_interval => stats_interval_secs);
    apply_file_opt!(sec, opts, delay_unit_ms => delay_unit_ms);
    apply_file_opt!(sec, opts, base_url => base_url);
    apply_file_opt!(sec, opts, retries => retries);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, progress => progress);
}
