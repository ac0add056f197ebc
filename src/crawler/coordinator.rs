//! Crawler coordinator - bounded breadth-first site traversal
//!
//! This module contains the crawl loop that coordinates:
//! - Seeding and draining the frontier
//! - Fetching and extracting each page in sequence
//! - Isolating per-page failures from the rest of the crawl
//! - Stopping at the page cap or when the frontier runs dry

use crate::config::CrawlerConfig;
use crate::crawler::extractor::{extract_page, ExtractError};
use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::page::PageRecord;
use crate::url::{is_same_origin, normalize_parsed, normalize_url};
use crate::UrlError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use url::{Origin, Url};

/// Request-level crawl failures
///
/// Per-page failures never surface here unless they hit the seed page.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("Seed page unreachable: {0}")]
    SeedUnreachable(FetchError),

    #[error("Seed page could not be parsed: {0}")]
    SeedUnparsable(ExtractError),
}

/// A page dropped from the crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlFailure {
    pub url: String,
    pub reason: String,
}

/// Pages collected by one crawl, in fetch order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    pub pages: Vec<PageRecord>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlResult {
    /// True when at least one discovered page was dropped
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// The seed page, if the crawl collected anything
    pub fn homepage(&self) -> Option<&PageRecord> {
        self.pages.first()
    }
}

/// Sequential same-origin crawler
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    max_pages: usize,
    max_content_chars: usize,
}

impl Crawler {
    /// Creates a crawler over the given fetcher
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &CrawlerConfig) -> Self {
        Self {
            fetcher,
            max_pages: config.max_pages,
            max_content_chars: config.max_content_chars,
        }
    }

    /// Crawls from `seed_url` collecting at most `max_pages` pages
    ///
    /// # Algorithm
    ///
    /// 1. Seed a FIFO frontier with the normalized seed URL
    /// 2. While the frontier is non-empty and fewer than `max_pages` pages
    ///    have been collected:
    ///    a. Pop the head (already-visited URLs are skipped)
    ///    b. Fetch it, follow redirects, and extract it against the final URL
    ///    c. On failure, record it and continue; a failing seed aborts
    ///    d. On success, append the page and enqueue its unvisited links
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Pages in fetch order plus any dropped URLs
    /// * `Err(CrawlError)` - The seed URL was invalid, unreachable or unparsable
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlResult, CrawlError> {
        let seed = normalize_url(seed_url)?;
        let mut origin = seed.origin();
        let mut frontier = Frontier::new(seed.clone());
        let mut result = CrawlResult::default();

        tracing::info!(
            "Starting crawl of {} (max {} pages)",
            seed,
            self.max_pages
        );

        while result.pages.len() < self.max_pages {
            let Some(url) = frontier.next_url() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            let is_seed = url == seed;
            tracing::debug!("Processing URL: {}", url);

            match self
                .process_url(&url, is_seed, &mut origin, &mut frontier)
                .await
            {
                Ok(Some(page)) => {
                    for link in &page.links {
                        if let Ok(link_url) = Url::parse(link) {
                            frontier.enqueue(link_url);
                        }
                    }
                    result.pages.push(page);
                }
                Ok(None) => {}
                Err(PageError::Fetch(e)) if is_seed => return Err(CrawlError::SeedUnreachable(e)),
                Err(PageError::Extract(e)) if is_seed => return Err(CrawlError::SeedUnparsable(e)),
                Err(PageError::InvalidRedirect(e)) if is_seed => {
                    return Err(CrawlError::InvalidSeed(e))
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    result.failures.push(CrawlFailure {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages collected, {} failed, {} still queued",
            result.pages.len(),
            result.failures.len(),
            frontier.len()
        );

        Ok(result)
    }

    /// Fetches `url` and extracts the page from the URL that served it
    ///
    /// A redirected seed moves the crawl origin to its target. Any other
    /// redirect must stay on the origin. Returns `Ok(None)` when the redirect
    /// target was already crawled.
    async fn process_url(
        &self,
        url: &Url,
        is_seed: bool,
        origin: &mut Origin,
        frontier: &mut Frontier,
    ) -> Result<Option<PageRecord>, PageError> {
        let fetched = self.fetcher.fetch(url).await?;
        let final_url = normalize_parsed(fetched.url)?;

        if final_url != *url {
            if is_seed {
                tracing::info!("Seed redirected to {}, crawling its origin", final_url);
                *origin = final_url.origin();
            } else if !is_same_origin(origin, &final_url) {
                return Err(PageError::OffOrigin(final_url.to_string()));
            }

            if !frontier.mark_visited(&final_url) {
                tracing::debug!("{} redirected to already crawled {}", url, final_url);
                return Ok(None);
            }
        }

        let page = extract_page(&fetched.html, &final_url, origin, self.max_content_chars)?;
        Ok(Some(page))
    }
}

/// Failure of a single page
#[derive(Debug, Error)]
enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Redirected outside the site to {0}")]
    OffOrigin(String),

    #[error("Invalid redirect target: {0}")]
    InvalidRedirect(#[from] UrlError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::{FetchCause, FetchedPage};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory site keyed by URL
    struct FakeSite {
        pages: HashMap<String, String>,
        redirects: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn new(pages: Vec<(&str, String)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(u, h)| (u.to_string(), h))
                    .collect(),
                redirects: HashMap::new(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn with_redirect(mut self, from: &str, to: &str) -> Self {
            self.redirects.insert(from.to_string(), to.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            let target = match self.redirects.get(url.as_str()) {
                Some(to) => Url::parse(to).unwrap(),
                None => url.clone(),
            };
            let html = self
                .pages
                .get(target.as_str())
                .cloned()
                .ok_or_else(|| FetchError::new(url.as_str(), FetchCause::Status(404)))?;
            Ok(FetchedPage { url: target, html })
        }
    }

    fn crawler(site: Arc<FakeSite>, max_pages: usize) -> Crawler {
        let config = CrawlerConfig {
            max_pages,
            ..CrawlerConfig::default()
        };
        Crawler::new(site, &config)
    }

    fn linked_page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">link</a>"#, l))
            .collect();
        format!("<html><body><p>Some text.</p>{}</body></html>", anchors)
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        let site = Arc::new(FakeSite::new(vec![
            ("https://example.com/", linked_page(&["/a", "/b"])),
            ("https://example.com/a", linked_page(&["/c"])),
            ("https://example.com/b", linked_page(&[])),
            ("https://example.com/c", linked_page(&[])),
        ]));

        let result = crawler(site, 10).crawl("https://example.com/").await.unwrap();
        let urls: Vec<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn test_page_cap_and_no_duplicates() {
        // Every page links to every other page, including itself
        let all = ["/", "/a", "/b", "/c", "/d", "/e"];
        let html = linked_page(&all);
        let urls: Vec<String> = all
            .iter()
            .map(|p| format!("https://example.com{}", p))
            .collect();
        let site = Arc::new(FakeSite::new(
            urls.iter().map(|u| (u.as_str(), html.clone())).collect(),
        ));

        let result = crawler(site.clone(), 3)
            .crawl("https://example.com/")
            .await
            .unwrap();

        assert_eq!(result.pages.len(), 3);
        let unique: HashSet<_> = result.pages.iter().map(|p| &p.url).collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(site.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_frontier_exhausted_before_cap() {
        let site = Arc::new(FakeSite::new(vec![
            ("https://example.com/", linked_page(&["/", "/a"])),
            ("https://example.com/a", linked_page(&["/"])),
        ]));

        let result = crawler(site.clone(), 50)
            .crawl("https://example.com/")
            .await
            .unwrap();
        assert_eq!(result.pages.len(), 2);
        assert_eq!(site.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_is_skipped() {
        let site = Arc::new(FakeSite::new(vec![
            ("https://example.com/", linked_page(&["/missing", "/ok"])),
            ("https://example.com/ok", linked_page(&[])),
        ]));

        let result = crawler(site, 5).crawl("https://example.com/").await.unwrap();
        assert_eq!(result.pages.len(), 2);
        assert!(result.is_partial());
        assert_eq!(result.failures[0].url, "https://example.com/missing");
        assert!(result.failures[0].reason.contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_failed_page_does_not_count_toward_cap() {
        let site = Arc::new(FakeSite::new(vec![
            ("https://example.com/", linked_page(&["/missing", "/ok"])),
            ("https://example.com/ok", linked_page(&[])),
        ]));

        let result = crawler(site, 2).crawl("https://example.com/").await.unwrap();
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.pages[1].url, "https://example.com/ok");
    }

    #[tokio::test]
    async fn test_unreachable_seed_aborts() {
        let site = Arc::new(FakeSite::new(vec![]));
        let result = crawler(site, 5).crawl("https://example.com/").await;
        assert!(matches!(result, Err(CrawlError::SeedUnreachable(_))));
    }

    #[tokio::test]
    async fn test_blank_seed_aborts() {
        let site = Arc::new(FakeSite::new(vec![("https://example.com/", "   ".to_string())]));
        let result = crawler(site, 5).crawl("https://example.com/").await;
        assert!(matches!(result, Err(CrawlError::SeedUnparsable(_))));
    }

    #[tokio::test]
    async fn test_invalid_seed_never_fetches() {
        let site = Arc::new(FakeSite::new(vec![]));
        let result = crawler(site.clone(), 5).crawl("ftp://example.com/").await;
        assert!(matches!(result, Err(CrawlError::InvalidSeed(_))));
        assert!(site.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cross_origin_links_never_fetched() {
        let site = Arc::new(FakeSite::new(vec![(
            "https://example.com/",
            linked_page(&["https://other.com/", "https://example.com.evil.net/"]),
        )]));

        let result = crawler(site.clone(), 5)
            .crawl("https://example.com/")
            .await
            .unwrap();
        assert_eq!(result.pages.len(), 1);
        assert_eq!(site.requests(), vec!["https://example.com/".to_string()]);
    }

    #[tokio::test]
    async fn test_relative_links_resolve_against_redirect_target() {
        let site = Arc::new(
            FakeSite::new(vec![
                ("https://example.com/", linked_page(&["/docs"])),
                ("https://example.com/docs/", linked_page(&["intro"])),
                ("https://example.com/docs/intro", linked_page(&[])),
            ])
            .with_redirect("https://example.com/docs", "https://example.com/docs/"),
        );

        let result = crawler(site, 10).crawl("https://example.com/").await.unwrap();
        let urls: Vec<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/docs/",
                "https://example.com/docs/intro"
            ]
        );
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn test_seed_redirect_moves_origin() {
        let site = Arc::new(
            FakeSite::new(vec![
                (
                    "https://www.example.com/",
                    linked_page(&["https://www.example.com/a", "https://example.com/b"]),
                ),
                ("https://www.example.com/a", linked_page(&[])),
            ])
            .with_redirect("https://example.com/", "https://www.example.com/"),
        );

        let result = crawler(site.clone(), 10)
            .crawl("https://example.com/")
            .await
            .unwrap();
        let urls: Vec<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://www.example.com/", "https://www.example.com/a"]);
        assert!(!site.requests().contains(&"https://example.com/b".to_string()));
    }

    #[tokio::test]
    async fn test_redirect_off_origin_is_a_failure() {
        let site = Arc::new(
            FakeSite::new(vec![
                ("https://example.com/", linked_page(&["/out"])),
                ("https://other.com/landing", linked_page(&[])),
            ])
            .with_redirect("https://example.com/out", "https://other.com/landing"),
        );

        let result = crawler(site, 10).crawl("https://example.com/").await.unwrap();
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.failures[0].url, "https://example.com/out");
        assert!(result.failures[0].reason.contains("https://other.com/landing"));
    }

    #[tokio::test]
    async fn test_redirect_to_crawled_page_is_not_duplicated() {
        let site = Arc::new(
            FakeSite::new(vec![("https://example.com/", linked_page(&["/old"]))])
                .with_redirect("https://example.com/old", "https://example.com/"),
        );

        let result = crawler(site.clone(), 10)
            .crawl("https://example.com/")
            .await
            .unwrap();
        assert_eq!(result.pages.len(), 1);
        assert!(!result.is_partial());
        assert_eq!(site.requests().len(), 2);
    }
}
