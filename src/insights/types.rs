use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures of external collaborators (language model, page-speed probe)
///
/// These never abort an analysis; they become a degraded field in the report.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("{0} is disabled")]
    Disabled(&'static str),

    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),

    #[error("Unexpected response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error.to_string())
        }
    }
}

/// Either the collaborator's data or a typed error marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CollaboratorOutcome<T> {
    Ok { data: T },
    Error { error: String },
}

impl<T> CollaboratorOutcome<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl<T> From<Result<T, CollaboratorError>> for CollaboratorOutcome<T> {
    fn from(result: Result<T, CollaboratorError>) -> Self {
        match result {
            Ok(data) => Self::Ok { data },
            Err(e) => Self::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Qualitative insights returned by the language model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// How well AI assistants can understand and cite the page (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_visibility_score: Option<f64>,

    /// How unambiguous the page's topic and entities are (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_clarity: Option<f64>,

    pub ai_summary: String,

    #[serde(default)]
    pub optimized_title: String,

    #[serde(default)]
    pub optimized_description: String,

    #[serde(default)]
    pub suggested_faqs: Vec<Faq>,

    #[serde(default)]
    pub content_suggestions: Vec<String>,

    /// One paragraph of the page rewritten for clarity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rewrite: Option<String>,
}

impl Insights {
    /// Checks the fields the rest of the report depends on
    pub fn validate(&self) -> Result<(), CollaboratorError> {
        if self.ai_summary.trim().is_empty() {
            return Err(CollaboratorError::InvalidResponse(
                "aiSummary is missing or empty".to_string(),
            ));
        }

        for (name, score) in [
            ("aiVisibilityScore", self.ai_visibility_score),
            ("semanticClarity", self.semantic_clarity),
        ] {
            if let Some(score) = score {
                if !(0.0..=100.0).contains(&score) {
                    return Err(CollaboratorError::InvalidResponse(format!(
                        "{} out of range: {}",
                        name, score
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Lab performance data for the seed URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub strategy: String,

    /// Lighthouse performance score scaled to 0-100
    pub performance_score: Option<f64>,

    /// Audit id to display value (e.g. "first-contentful-paint" -> "1.2 s")
    pub metrics: BTreeMap<String, String>,
}
