//! External collaborators: the language-model summarizer and the
//! page-speed probe
//!
//! Both are optional. Their failures are reported as [`CollaboratorError`]
//! and end up as a degraded field in the report rather than aborting it.

mod gemini;
mod pagespeed;
mod prompt;
mod types;

pub use gemini::GeminiSummarizer;
pub use pagespeed::PageSpeedProbe;
pub use prompt::build_prompt;
pub use types::{
    CollaboratorError, CollaboratorOutcome, Faq, Insights, PerformanceSummary,
};

use crate::config::Config;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Environment variable consulted when no Gemini key is configured
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Produces qualitative insights from page text
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        url: &str,
        text: &str,
        keywords: &[String],
    ) -> Result<Insights, CollaboratorError>;
}

/// Measures lab performance for a single URL
#[async_trait]
pub trait PerformanceProbe: Send + Sync {
    async fn measure(&self, url: &str) -> Result<PerformanceSummary, CollaboratorError>;
}

/// Summarizer used when insights are turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(
        &self,
        _url: &str,
        _text: &str,
        _keywords: &[String],
    ) -> Result<Insights, CollaboratorError> {
        Err(CollaboratorError::Disabled("insights"))
    }
}

/// Probe used when page-speed measurement is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProbe;

#[async_trait]
impl PerformanceProbe for DisabledProbe {
    async fn measure(&self, _url: &str) -> Result<PerformanceSummary, CollaboratorError> {
        Err(CollaboratorError::Disabled("pagespeed"))
    }
}

/// Builds the summarizer described by the configuration
///
/// A configured `api-key` wins over the `GEMINI_API_KEY` environment
/// variable. With neither, the Gemini summarizer is still built and reports
/// [`CollaboratorError::MissingApiKey`] on every call.
pub fn summarizer_from_config(config: &Config) -> Result<Arc<dyn Summarizer>, reqwest::Error> {
    if !config.insights.enabled {
        debug!("Insights disabled by configuration");
        return Ok(Arc::new(DisabledSummarizer));
    }

    let api_key = config
        .insights
        .api_key
        .clone()
        .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
        .filter(|key| !key.trim().is_empty());

    if api_key.is_none() {
        warn!(
            "Insights enabled but no API key configured (set insights.api-key or {})",
            GEMINI_API_KEY_ENV
        );
    }

    Ok(Arc::new(GeminiSummarizer::new(&config.insights, api_key)?))
}

/// Builds the performance probe described by the configuration
pub fn probe_from_config(config: &Config) -> Result<Arc<dyn PerformanceProbe>, reqwest::Error> {
    if !config.pagespeed.enabled {
        debug!("PageSpeed probe disabled by configuration");
        return Ok(Arc::new(DisabledProbe));
    }

    Ok(Arc::new(PageSpeedProbe::new(&config.pagespeed)?))
}
