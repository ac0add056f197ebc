//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with an identifying user agent string
//! - Enforcing the per-page timeout
//! - Classifying failures into [`FetchError`]

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single page
const MAX_REDIRECTS: usize = 10;

/// A page could not be retrieved
#[derive(Debug, Clone, Error)]
#[error("Failed to fetch {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    /// The request exceeded the configured timeout
    Timeout,
    /// The server answered with a non-success status
    Status(u16),
    /// The response was not HTML
    ContentMismatch(String),
    /// Connection, TLS, redirect or body errors
    Network(String),
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::ContentMismatch(content_type) => {
                write!(f, "expected HTML, got {}", content_type)
            }
            Self::Network(message) => write!(f, "{}", message),
        }
    }
}

/// A fetched HTML document and the URL it was served from
///
/// `url` differs from the requested URL when redirects were followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: Url,
    pub html: String,
}

/// Retrieves raw HTML for a single URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with the crawler's user agent and timeout
///
/// # Example
///
/// ```no_run
/// use seo_scout::config::UserAgentConfig;
/// use seo_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "SeoScout".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose every request is bounded by `timeout`
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL, following redirects, and returns its HTML body
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML (or missing) Content-Type | body and final URL |
/// | non-2xx status | `FetchCause::Status` |
/// | non-HTML Content-Type | `FetchCause::ContentMismatch` |
/// | timeout | `FetchCause::Timeout` |
/// | anything else | `FetchCause::Network` |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| FetchError::new(url.as_str(), classify_error(&e)))?;

    let final_url = response.url().clone();
    if final_url != *url {
        tracing::debug!("{} redirected to {}", url, final_url);
    }

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            url.as_str(),
            FetchCause::Status(status.as_u16()),
        ));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return Err(FetchError::new(
            url.as_str(),
            FetchCause::ContentMismatch(content_type),
        ));
    }

    let html = response
        .text()
        .await
        .map_err(|e| FetchError::new(url.as_str(), classify_error(&e)))?;

    Ok(FetchedPage {
        url: final_url,
        html,
    })
}

fn classify_error(error: &reqwest::Error) -> FetchCause {
    if error.is_timeout() {
        FetchCause::Timeout
    } else if error.is_connect() {
        FetchCause::Network(format!("connection failed: {}", error))
    } else {
        FetchCause::Network(error.to_string())
    }
}

/// Missing Content-Type headers are treated as HTML
fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.is_empty() || content_type.contains("html")
}
