use serde::Deserialize;

/// Main configuration structure for SEO Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub pagespeed: PageSpeedConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages collected per analysis
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Hard upper bound for a single page fetch (milliseconds)
    #[serde(rename = "page-timeout-ms", default = "default_page_timeout_ms")]
    pub page_timeout_ms: u64,

    /// Maximum number of characters of visible text kept per page
    #[serde(rename = "max-content-chars", default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Optional upper bound for a whole analysis request (seconds)
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            page_timeout_ms: default_page_timeout_ms(),
            max_content_chars: default_max_content_chars(),
            request_timeout_secs: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Language model collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the generative language API
    #[serde(default = "default_insights_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// API key; when absent the `GEMINI_API_KEY` environment variable is used
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Maximum number of characters of page text sent in the prompt
    #[serde(rename = "max-prompt-chars", default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    #[serde(rename = "timeout-secs", default = "default_insights_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_insights_endpoint(),
            model: default_model(),
            api_key: None,
            max_prompt_chars: default_max_prompt_chars(),
            timeout_secs: default_insights_timeout_secs(),
        }
    }
}

/// Page-speed collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpeedConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_pagespeed_endpoint")]
    pub endpoint: String,

    /// Either "mobile" or "desktop"
    #[serde(default = "default_strategy")]
    pub strategy: String,

    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    #[serde(rename = "timeout-secs", default = "default_pagespeed_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PageSpeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_pagespeed_endpoint(),
            strategy: default_strategy(),
            api_key: None,
            timeout_secs: default_pagespeed_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory where rendered report documents are written
    #[serde(rename = "report-dir")]
    pub report_dir: String,
}

fn default_max_pages() -> usize {
    5
}

fn default_page_timeout_ms() -> u64 {
    15_000
}

fn default_max_content_chars() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_insights_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_max_prompt_chars() -> usize {
    8_000
}

fn default_insights_timeout_secs() -> u64 {
    60
}

fn default_pagespeed_endpoint() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_strategy() -> String {
    "mobile".to_string()
}

fn default_pagespeed_timeout_secs() -> u64 {
    90
}
