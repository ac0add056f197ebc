use crate::analytics::{KeywordDensityReport, Readability};
use crate::crawler::CrawlFailure;
use crate::insights::{CollaboratorOutcome, Insights, PerformanceSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The response of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub url: String,
    pub keywords: Vec<String>,
    pub pages_analyzed: usize,
    pub analysis: Analysis,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub pages: Vec<PageAudit>,
    pub keyword_density: KeywordDensityReport,
    pub readability: Readability,
    /// Audit of the homepage title and description
    pub meta_tags: Option<MetaTagAudit>,
    pub structured_data: StructuredDataSummary,
    pub crawl: CrawlSummary,
    pub insights: CollaboratorOutcome<Insights>,
    pub performance: CollaboratorOutcome<PerformanceSummary>,
}

/// Per-page suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAudit {
    pub url: String,
    pub title: String,
    pub word_count: usize,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTagAudit {
    pub url: String,
    pub title: String,
    pub title_length: usize,
    pub description: String,
    pub description_length: usize,
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDataSummary {
    /// Pages carrying at least one JSON-LD block
    pub pages_with_structured_data: usize,
    /// Sorted, distinct `@type` values
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    pub partial: bool,
    pub failures: Vec<CrawlFailure>,
}
