//! Crawler module for page fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a hard per-page timeout
//! - HTML extraction of SEO signals
//! - The breadth-first frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod page;

pub use coordinator::{CrawlError, CrawlFailure, CrawlResult, Crawler};
pub use extractor::{extract_page, ExtractError, StructuredDataParseError};
pub use fetcher::{
    build_http_client, fetch_url, FetchCause, FetchError, FetchedPage, HttpFetcher,
    PageFetcher,
};
pub use frontier::Frontier;
pub use page::{ImageRecord, PageRecord, HEADING_LEVELS};

pub(crate) use extractor::truncate_chars;

use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;

/// Builds a crawler that fetches over HTTP using the configured user agent
///
/// # Arguments
///
/// * `config` - The full configuration
///
/// # Returns
///
/// * `Ok(Crawler)` - Crawler ready to run
/// * `Err(reqwest::Error)` - The HTTP client could not be built
pub fn http_crawler(config: &Config) -> Result<Crawler, reqwest::Error> {
    let timeout = Duration::from_millis(config.crawler.page_timeout_ms);
    let fetcher = HttpFetcher::new(&config.user_agent, timeout)?;
    Ok(Crawler::new(Arc::new(fetcher), &config.crawler))
}
