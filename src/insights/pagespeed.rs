//! PageSpeed Insights performance probe

use crate::config::PageSpeedConfig;
use crate::insights::{CollaboratorError, PerformanceProbe, PerformanceSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument};

const RUN_PAGESPEED_PATH: &str = "pagespeedonline/v5/runPagespeed";

/// Lighthouse audits reported as lab metrics
const METRIC_AUDITS: [&str; 5] = [
    "first-contentful-paint",
    "largest-contentful-paint",
    "total-blocking-time",
    "cumulative-layout-shift",
    "speed-index",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunPagespeedResponse {
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: HashMap<String, Category>,
    #[serde(default)]
    audits: HashMap<String, Audit>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Audit {
    display_value: Option<String>,
}

/// [`PerformanceProbe`] backed by the PageSpeed Insights v5 API
#[derive(Debug, Clone)]
pub struct PageSpeedProbe {
    client: Client,
    endpoint: String,
    strategy: String,
    api_key: Option<String>,
}

impl PageSpeedProbe {
    pub fn new(config: &PageSpeedConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            strategy: config.strategy.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PerformanceProbe for PageSpeedProbe {
    #[instrument(skip(self), level = "debug")]
    async fn measure(&self, url: &str) -> Result<PerformanceSummary, CollaboratorError> {
        let mut query = vec![
            ("url", url),
            ("strategy", self.strategy.as_str()),
            ("category", "performance"),
        ];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }

        debug!("Requesting PageSpeed run ({})", self.strategy);
        let response = self
            .client
            .get(format!("{}/{}", self.endpoint, RUN_PAGESPEED_PATH))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: RunPagespeedResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;

        let lighthouse = body
            .lighthouse_result
            .ok_or(CollaboratorError::EmptyResponse("pagespeed"))?;

        Ok(summarize_lighthouse(&self.strategy, lighthouse))
    }
}

fn summarize_lighthouse(strategy: &str, lighthouse: LighthouseResult) -> PerformanceSummary {
    let performance_score = lighthouse
        .categories
        .get("performance")
        .and_then(|category| category.score)
        .map(|score| (score * 100.0).round());

    let metrics: BTreeMap<String, String> = METRIC_AUDITS
        .iter()
        .filter_map(|id| {
            let value = lighthouse.audits.get(*id)?.display_value.clone()?;
            Some((id.to_string(), value))
        })
        .collect();

    PerformanceSummary {
        strategy: strategy.to_string(),
        performance_score,
        metrics,
    }
}
