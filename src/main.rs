//! SEO Scout main entry point
//!
//! This is the command-line interface for the SEO Scout site auditor.

use anyhow::{bail, Context};
use clap::Parser;
use seo_scout::config::{load_config_with_hash, Config};
use seo_scout::output::MarkdownRenderer;
use seo_scout::pipeline::{analyze_and_store, render_document};
use seo_scout::storage::{open_store, ReportStore};
use seo_scout::{AnalyzeRequest, Analyzer};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// SEO Scout: a small-site SEO auditor
///
/// SEO Scout crawls a few same-origin pages from a seed URL, measures keyword
/// density and readability, audits headings, images and meta tags, gathers
/// AI insights and performance data, and stores a report for every run.
#[derive(Parser, Debug)]
#[command(name = "seo-scout")]
#[command(version)]
#[command(about = "A small-site SEO auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed URL to analyze
    #[arg(long, conflicts_with = "request")]
    url: Option<String>,

    /// Target keyword (repeatable)
    #[arg(short, long = "keyword", value_name = "KEYWORD", requires = "url")]
    keywords: Vec<String>,

    /// JSON request file: {"url": "...", "keywords": ["..."]}
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and request and show what would be crawled
    #[arg(long, conflicts_with_all = ["list", "export"])]
    dry_run: bool,

    /// List stored reports and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export"])]
    list: bool,

    /// Render a stored report to the report directory and exit
    #[arg(long, value_name = "ID", conflicts_with_all = ["dry_run", "list"])]
    export: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.list {
        return handle_list(&config, &config_hash);
    }
    if let Some(id) = cli.export {
        return handle_export(&config, &config_hash, id);
    }

    let request = read_request(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &request);
        return Ok(());
    }

    handle_analyze(&config, &config_hash, &request).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_scout=info,warn"),
            1 => EnvFilter::new("seo_scout=debug,info"),
            2 => EnvFilter::new("seo_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the request from `--request FILE` or `--url`/`--keyword`
fn read_request(cli: &Cli) -> anyhow::Result<AnalyzeRequest> {
    let request = match (&cli.request, &cli.url) {
        (Some(path), _) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file {}", path.display()))?;
            AnalyzeRequest::from_json(&body)?
        }
        (None, Some(url)) => AnalyzeRequest::new(url.clone(), cli.keywords.clone())?,
        (None, None) => bail!("Provide either --url (with --keyword) or --request FILE"),
    };
    Ok(request)
}

/// Handles the --dry-run mode: validates config and request, shows the plan
fn handle_dry_run(config: &Config, request: &AnalyzeRequest) {
    println!("=== SEO Scout Dry Run ===\n");

    println!("Request:");
    println!("  URL: {}", request.url);
    println!("  Keywords: {}", request.keywords.join(", "));

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Page timeout: {}ms", config.crawler.page_timeout_ms);
    println!("  Max content chars: {}", config.crawler.max_content_chars);
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nCollaborators:");
    if config.insights.enabled {
        println!(
            "  Insights: {} ({})",
            config.insights.model, config.insights.endpoint
        );
    } else {
        println!("  Insights: disabled");
    }
    if config.pagespeed.enabled {
        println!(
            "  PageSpeed: {} ({})",
            config.pagespeed.strategy, config.pagespeed.endpoint
        );
    } else {
        println!("  PageSpeed: disabled");
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Reports: {}", config.output.report_dir);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} page(s) starting at {}",
        config.crawler.max_pages, request.url
    );
}

/// Handles the --list mode: shows stored reports
fn handle_list(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let store = open_store(Path::new(&config.output.database_path), config_hash)?;
    let summaries = store.list()?;

    println!("Database: {}\n", config.output.database_path);
    if summaries.is_empty() {
        println!("No stored reports.");
        return Ok(());
    }

    println!("{:>5}  {:<20}  {:>5}  {:<40}  KEYWORDS", "ID", "ANALYZED", "PAGES", "URL");
    for summary in summaries {
        println!(
            "{:>5}  {:<20}  {:>5}  {:<40}  {}",
            summary.id,
            summary.analyzed_at.format("%Y-%m-%d %H:%M:%S"),
            summary.pages_analyzed,
            summary.url,
            summary.keywords.join(", ")
        );
    }

    Ok(())
}

/// Handles the --export mode: renders a stored report
fn handle_export(config: &Config, config_hash: &str, id: i64) -> anyhow::Result<()> {
    let store = open_store(Path::new(&config.output.database_path), config_hash)?;
    let report = store.load(id)?;

    let path = render_document(
        &report,
        id,
        &MarkdownRenderer,
        Path::new(&config.output.report_dir),
    )?;
    println!("✓ Report {} exported to: {}", id, path.display());

    Ok(())
}

/// Handles the main analysis: crawl, analyze, persist, render, print JSON
async fn handle_analyze(
    config: &Config,
    config_hash: &str,
    request: &AnalyzeRequest,
) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(config).context("Failed to build HTTP clients")?;
    let mut store = open_store(Path::new(&config.output.database_path), config_hash)?;

    tracing::info!(
        "Analyzing {} for {} keyword(s)",
        request.url,
        request.keywords.len()
    );

    let stored = match analyze_and_store(
        &analyzer,
        request,
        &mut store,
        &MarkdownRenderer,
        Path::new(&config.output.report_dir),
    )
    .await
    {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(document) = &stored.document {
        tracing::info!("Document written to {}", document.display());
    }
    println!("{}", serde_json::to_string_pretty(&stored.report)?);

    Ok(())
}
