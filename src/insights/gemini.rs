//! Gemini `generateContent` summarizer

use crate::config::InsightsConfig;
use crate::insights::prompt::build_prompt;
use crate::insights::{CollaboratorError, Insights, Summarizer};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const API_VERSION: &str = "v1beta";
const SERVICE: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// [`Summarizer`] backed by the Gemini REST API
///
/// The API key travels as the `key` query parameter. The model is asked for
/// a JSON response, which is parsed straight into [`Insights`].
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_prompt_chars: usize,
}

impl GeminiSummarizer {
    pub fn new(config: &InsightsConfig, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_prompt_chars: config.max_prompt_chars,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.endpoint, API_VERSION, self.model
        )
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    #[instrument(skip(self, text, keywords), level = "debug")]
    async fn summarize(
        &self,
        url: &str,
        text: &str,
        keywords: &[String],
    ) -> Result<Insights, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::MissingApiKey(SERVICE))?;

        let prompt = build_prompt(url, text, keywords, self.max_prompt_chars);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.2,
            },
        };

        debug!("Sending generateContent request for model {}", self.model);
        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;

        let text = response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(CollaboratorError::EmptyResponse(SERVICE))?;

        parse_insights(&text)
    }
}

/// Parses the model's JSON answer, tolerating a surrounding code fence
fn parse_insights(text: &str) -> Result<Insights, CollaboratorError> {
    let json = strip_code_fence(text);
    let insights: Insights = serde_json::from_str(json)
        .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
    insights.validate()?;
    Ok(insights)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
