//! Sumi-Scrape main entry point
//!
//! This is the command-line interface for the Sumi-Scrape site scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_scrape::config::{parse_sublinks, resolve_config, Config, LogLevel, PartialConfig};
use sumi_scrape::crawler::crawl;
use sumi_scrape::output::print_summary;
use tracing_subscriber::EnvFilter;

/// Sumi-Scrape: a depth-bounded single-site scraper
///
/// Sumi-Scrape walks one site breadth-first from a starting path, appends
/// every fetched page to one HTML file, optionally extracts text for a
/// selector, and converts the capture to markdown at the end.
#[derive(Parser, Debug)]
#[command(name = "sumi-scrape")]
#[command(version)]
#[command(about = "A depth-bounded single-site scraper", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the site to scrape
    #[arg(long)]
    url: Option<String>,

    /// Name of the HTML capture file
    #[arg(long)]
    file_name: Option<String>,

    /// Directory for all output files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Comma-separated substrings a link must contain to be followed
    #[arg(long, value_name = "LIST")]
    sublinks: Option<String>,

    /// Starting path appended to the base URL
    #[arg(long)]
    sub_path: Option<String>,

    /// Maximum number of pages to process
    #[arg(long, allow_negative_numbers = true)]
    max_depth: Option<i64>,

    /// Selector to extract text for (.class, #id or tag)
    #[arg(long)]
    target_selector: Option<String>,

    /// Log level (DEBUG, INFO, WARNING, ERROR)
    #[arg(long)]
    log_level: Option<String>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Flags given on the command line, layered over the config file
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            url: self.url.clone(),
            file_name: self.file_name.clone(),
            output_dir: self.output_dir.clone(),
            sublinks: self.sublinks.as_deref().map(parse_sublinks),
            sub_path: self.sub_path.clone(),
            max_depth: self.max_depth,
            target_selector: self.target_selector.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            setup_logging(LogLevel::default(), cli.verbose, cli.quiet);
            tracing::error!("Invalid configuration: {}", e);
            return Err(e).context("failed to load configuration");
        }
    };

    setup_logging(config.log_level, cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the tracing subscriber
///
/// `RUST_LOG` wins when set. Otherwise the configured level applies, shifted
/// by `-v` or `-q`.
fn setup_logging(level: LogLevel, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if quiet {
            "error".to_string()
        } else {
            match verbose {
                0 => format!("sumi_scrape={},warn", level.filter_level()),
                1 => "sumi_scrape=debug,info".to_string(),
                _ => "sumi_scrape=trace,debug".to_string(),
            }
        };
        EnvFilter::new(directive)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Scrape Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.url);
    println!(
        "  Starting path: {}",
        if config.sub_path.is_empty() {
            "(base URL)"
        } else {
            &config.sub_path
        }
    );
    println!("  Max depth: {}", config.max_depth);

    println!("\nSublink filters ({}):", config.sublinks.len());
    if config.sublinks.is_empty() {
        println!("  (none, every in-site link is followed)");
    }
    for pattern in &config.sublinks {
        println!("  - {}", pattern);
    }

    println!("\nOutput:");
    println!("  HTML capture: {}", config.output_path().display());
    println!(
        "  Markdown: {}",
        config.output_path().with_extension("md").display()
    );
    match &config.target_selector {
        Some(selector) => println!("  Selector: {}", selector),
        None => println!("  Selector: none"),
    }

    println!("\nLog level: {}", config.log_level);

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {}{} (max depth {})",
        config.url,
        config.sub_path,
        config.max_depth
    );

    match crawl(config).await {
        Ok(summary) => {
            tracing::info!("Scrape completed");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
