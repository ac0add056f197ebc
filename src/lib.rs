//! SEO Scout: a small-site SEO auditor
//!
//! This crate crawls a handful of same-origin pages from a seed URL, extracts
//! SEO signals from each page, computes keyword density and readability, asks
//! external collaborators for qualitative insights and performance data, and
//! assembles everything into a persisted, renderable report.

pub mod analytics;
pub mod config;
pub mod crawler;
pub mod insights;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Request-level error type for SEO Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] request::InputValidationError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] pipeline::AnalysisError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for SEO Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, PageRecord};
pub use pipeline::Analyzer;
pub use report::AnalysisReport;
pub use request::AnalyzeRequest;
