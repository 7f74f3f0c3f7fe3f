use clap::Parser;
use std::path::PathBuf;

use crate::Opts;

/// Breadth-first crawl of a follows graph from a seed account.
#[derive(Clone, Debug, Parser)]
#[command(name = "followcrawl")]
#[command(
    about = "Crawl who-follows-whom outward from a seed account; write edges and failures to SQLite."
)]
pub struct Cli {
    /// Seed login name. Default: `seed` from .followcrawl.toml.
    #[arg(value_name = "SEED")]
    pub seed: Option<String>,

    /// BFS levels to expand past the seed (0 only resolves the seed). Default: 1.
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub depth: Option<i64>,

    /// Worker pool size. Default: 13.
    #[arg(long, short = 'p')]
    pub pool_size: Option<usize>,

    /// SQLite output file. Default: followcrawl.db.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Build the first level from the seed's followers instead of the accounts it follows.
    #[arg(long, short = 'F', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub followers_seed: Option<bool>,

    /// Seconds between stats lines (0 disables). Default: 10.
    #[arg(long, short = 's')]
    pub stats_interval: Option<u64>,

    /// Pacing unit in milliseconds: a fully idle pool waits this long before each request. Default: 1000.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// API base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Extra attempts per page before it counts as failed. Default: 1.
    #[arg(long, short = 'r')]
    pub retries: Option<u32>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Show a running count of processed nodes.
    #[arg(long, short = 'P', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,
}

/// Overwrite opts field from the command line when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

impl Cli {
    /// Apply flags given on the command line. Call after the config file has been applied.
    pub fn apply_to(&self, opts: &mut Opts) {
        if let Some(ref s) = self.seed {
            opts.seed = Some(s.clone());
        }
        apply_cli_opt!(self, opts, depth => depth);
        apply_cli_opt!(self, opts, pool_size => pool_size);
        apply_cli_opt!(self, opts, output => output);
        apply_cli_opt!(self, opts, followers_seed => followers_seed);
        apply_cli_opt!(self, opts, stats_interval => stats_interval_secs);
        apply_cli_opt!(self, opts, delay_ms => delay_unit_ms);
        apply_cli_opt!(self, opts, base_url => base_url);
        apply_cli_opt!(self, opts, retries => retries);
        apply_cli_opt!(self, opts, verbose => verbose);
        apply_cli_opt!(self, opts, progress => progress);
    }
}
