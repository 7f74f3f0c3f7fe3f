use clap::Parser;
use followcrawl::engine::{Cli, resolve_opts};
use followcrawl::pager::{parse_page, parse_user_id};
use followcrawl::pipeline::check_crawl_opts;
use followcrawl::utils::credentials::read_dotenv_key;
use followcrawl::utils::crawl_toml::{apply_file_to_opts, parse_crawl_toml};
use followcrawl::{CrawlOpts, Direction, Edge, NodeId, Opts};
use std::path::PathBuf;
use std::time::Duration;

// --- parse_page ---

#[test]
fn test_parse_page_with_cursor() {
    let body = r#"{
        "total": 250,
        "data": [
            {"from_id": "42", "from_name": "a", "to_id": "7", "to_name": "b", "followed_at": "x"},
            {"from_id": "42", "to_id": "8"}
        ],
        "pagination": {"cursor": "abc"}
    }"#;
    let page = parse_page(body).unwrap();
    assert_eq!(page.edges, vec![Edge::new("42", "7"), Edge::new("42", "8")]);
    assert_eq!(page.next_cursor.as_deref(), Some("abc"));
    assert_eq!(page.total, 250);
}

#[test]
fn test_parse_page_empty_data_has_no_cursor() {
    let body = r#"{"total": 5, "data": [], "pagination": {"cursor": "stale"}}"#;
    let page = parse_page(body).unwrap();
    assert!(page.edges.is_empty());
    assert_eq!(page.next_cursor, None);
    assert_eq!(page.total, 5);
}

#[test]
fn test_parse_page_without_pagination() {
    let body = r#"{"total": 1, "data": [{"from_id": "1", "to_id": "2"}], "pagination": {}}"#;
    let page = parse_page(body).unwrap();
    assert_eq!(page.edges.len(), 1);
    assert_eq!(page.next_cursor, None);

    let page = parse_page(r#"{"data": [{"from_id": "1", "to_id": "2"}]}"#).unwrap();
    assert_eq!(page.next_cursor, None);
    assert_eq!(page.total, 0);
}

#[test]
fn test_parse_page_empty_cursor_ends_paging() {
    let body = r#"{"total": 1, "data": [{"from_id": "1", "to_id": "2"}], "pagination": {"cursor": ""}}"#;
    assert_eq!(parse_page(body).unwrap().next_cursor, None);
}

#[test]
fn test_parse_page_rejects_garbage() {
    assert!(parse_page("not json").is_err());
    assert!(parse_page(r#"{"data": [{"from_id": "1"}]}"#).is_err());
}

// --- parse_user_id ---

#[test]
fn test_parse_user_id() {
    let body = r#"{"data": [{"id": "141981764", "login": "somechannel"}]}"#;
    assert_eq!(parse_user_id(body).unwrap(), NodeId::from("141981764"));
}

#[test]
fn test_parse_user_id_no_match() {
    assert!(parse_user_id(r#"{"data": []}"#).is_err());
    assert!(parse_user_id("{}").is_err());
}

// --- .followcrawl.toml ---

#[test]
fn test_crawl_toml_applies_present_fields_only() {
    let file = parse_crawl_toml(
        r#"
        [settings]
        seed = "somechannel"
        depth = 3
        pool_size = 4
        followers_seed = true
        output = "out/graph.db"
        stats_interval = 0
        "#,
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);

    assert_eq!(opts.seed.as_deref(), Some("somechannel"));
    assert_eq!(opts.depth, 3);
    assert_eq!(opts.pool_size, 4);
    assert!(opts.followers_seed);
    assert_eq!(opts.output, PathBuf::from("out/graph.db"));
    assert_eq!(opts.stats_interval_secs, 0);
    assert_eq!(opts.delay_unit_ms, Opts::default().delay_unit_ms);
    assert_eq!(opts.retries, Opts::default().retries);
}

#[test]
fn test_crawl_toml_empty_and_invalid() {
    let file = parse_crawl_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.depth, Opts::default().depth);

    assert!(parse_crawl_toml("[settings]\ndepth = \"deep\"").is_err());
}

// --- CLI / option layering ---

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".followcrawl.toml"),
        "[settings]\nseed = \"from_file\"\ndepth = 4\npool_size = 2\n",
    )
    .unwrap();

    let cli = Cli::parse_from(["followcrawl", "--depth", "2", "-o", "x.db"]);
    let opts = resolve_opts(&cli, dir.path()).unwrap();
    assert_eq!(opts.seed.as_deref(), Some("from_file"));
    assert_eq!(opts.depth, 2);
    assert_eq!(opts.pool_size, 2);
    assert_eq!(opts.output, PathBuf::from("x.db"));

    let cli = Cli::parse_from(["followcrawl", "other", "-F"]);
    let opts = resolve_opts(&cli, dir.path()).unwrap();
    assert_eq!(opts.seed.as_deref(), Some("other"));
    assert!(opts.followers_seed);
}

#[test]
fn test_resolve_opts_without_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::parse_from(["followcrawl", "seed"]);
    let opts = resolve_opts(&cli, dir.path()).unwrap();
    let defaults = Opts::default();
    assert_eq!(opts.depth, defaults.depth);
    assert_eq!(opts.pool_size, defaults.pool_size);
    assert_eq!(opts.output, defaults.output);
}

#[test]
fn test_resolve_opts_rejects_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".followcrawl.toml"), "[settings\n").unwrap();
    let cli = Cli::parse_from(["followcrawl", "seed"]);
    assert!(resolve_opts(&cli, dir.path()).is_err());
}

#[test]
fn test_negative_depth_parses_then_fails_check() {
    let cli = Cli::parse_from(["followcrawl", "seed", "--depth", "-1"]);
    assert_eq!(cli.depth, Some(-1));
    let mut opts = Opts::default();
    cli.apply_to(&mut opts);
    assert!(check_crawl_opts(&CrawlOpts::from(&opts)).is_err());
}

// --- CrawlOpts ---

#[test]
fn test_crawl_opts_from_opts() {
    let opts = Opts {
        depth: 2,
        pool_size: 5,
        followers_seed: true,
        stats_interval_secs: 0,
        delay_unit_ms: 250,
        ..Default::default()
    };
    let crawl = CrawlOpts::from(&opts);
    assert_eq!(crawl.depth, 2);
    assert_eq!(crawl.pool_size, 5);
    assert_eq!(crawl.seed_direction, Direction::Followers);
    assert_eq!(crawl.stats_interval, None);
    assert_eq!(crawl.delay_unit, Duration::from_millis(250));

    let crawl = CrawlOpts::from(&Opts::default());
    assert_eq!(crawl.seed_direction, Direction::Follows);
    assert_eq!(crawl.stats_interval, Some(Duration::from_secs(10)));
}

#[test]
fn test_check_crawl_opts() {
    let ok = CrawlOpts {
        depth: 0,
        pool_size: 1,
        ..Default::default()
    };
    let plan = check_crawl_opts(&ok).unwrap();
    assert_eq!(plan.depth, 0);
    assert_eq!(plan.pool_size, 1);

    let no_pool = CrawlOpts {
        pool_size: 0,
        ..Default::default()
    };
    assert!(check_crawl_opts(&no_pool).is_err());
}

// --- credentials ---

#[test]
fn test_read_dotenv_key() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        "FOLLOWCRAWL_CLIENT_ID=abc123\nFOLLOWCRAWL_AUTH_TOKEN=\"Bearer xyz\"\nEMPTY=\n",
    )
    .unwrap();

    assert_eq!(
        read_dotenv_key(&env_path, "FOLLOWCRAWL_CLIENT_ID").as_deref(),
        Some("abc123")
    );
    assert_eq!(
        read_dotenv_key(&env_path, "FOLLOWCRAWL_AUTH_TOKEN").as_deref(),
        Some("Bearer xyz")
    );
    assert_eq!(read_dotenv_key(&env_path, "EMPTY"), None);
    assert_eq!(read_dotenv_key(&env_path, "MISSING"), None);
    assert_eq!(read_dotenv_key(&dir.path().join("nope"), "FOLLOWCRAWL_CLIENT_ID"), None);
}
