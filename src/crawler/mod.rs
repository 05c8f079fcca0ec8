//! Crawler module for page fetching and traversal
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - The FIFO frontier with visited-set deduplication
//! - Overall scrape coordination

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::{run_crawl, Coordinator, DefaultCoordinator};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, USER_AGENT};
pub use frontier::Frontier;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::ScrapeError;

/// Runs a complete scrape operation
///
/// This is the main entry point for starting a scrape. It will:
/// 1. Validate the configuration
/// 2. Create the output file
/// 3. Build the HTTP client
/// 4. Fetch pages and follow links until the frontier or the depth budget runs out
/// 5. Convert the captured HTML to markdown
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Scrape finished (individual pages may have failed)
/// * `Err(ScrapeError)` - Scrape could not start
pub async fn crawl(config: Config) -> Result<CrawlSummary, ScrapeError> {
    run_crawl(&config).await
}
