//! Inbound analysis requests
//!
//! Requests arrive as JSON `{"url": "...", "keywords": ["..."]}`. They are
//! validated here, before any network access happens.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// A request that can never be served as given
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A validated analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub keywords: Vec<String>,
}

impl AnalyzeRequest {
    /// Builds a request from already separated parts
    ///
    /// # Examples
    ///
    /// ```
    /// use seo_scout::AnalyzeRequest;
    ///
    /// let request = AnalyzeRequest::new("https://example.com", vec!["widgets".into()]).unwrap();
    /// assert_eq!(request.url, "https://example.com");
    ///
    /// assert!(AnalyzeRequest::new("example.com", vec![]).is_err());
    /// ```
    pub fn new(url: impl Into<String>, keywords: Vec<String>) -> Result<Self, InputValidationError> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self { url, keywords })
    }

    /// Parses and validates a JSON request body
    pub fn from_json(body: &str) -> Result<Self, InputValidationError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| InputValidationError::MalformedJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validates an already parsed JSON value
    pub fn from_value(value: &Value) -> Result<Self, InputValidationError> {
        let object = value.as_object().ok_or(InputValidationError::NotAnObject)?;

        let url = match object.get("url") {
            None | Some(Value::Null) => return Err(InputValidationError::MissingField("url")),
            Some(Value::String(url)) => url.clone(),
            Some(_) => {
                return Err(InputValidationError::InvalidField {
                    field: "url",
                    reason: "must be a string".to_string(),
                })
            }
        };

        let keywords = match object.get("keywords") {
            None | Some(Value::Null) => {
                return Err(InputValidationError::MissingField("keywords"))
            }
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        InputValidationError::InvalidField {
                            field: "keywords",
                            reason: "must be an array of strings".to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(InputValidationError::InvalidField {
                    field: "keywords",
                    reason: "must be an array of strings".to_string(),
                })
            }
        };

        Self::new(url, keywords)
    }
}

fn validate_url(url: &str) -> Result<(), InputValidationError> {
    let parsed = Url::parse(url.trim()).map_err(|e| InputValidationError::InvalidField {
        field: "url",
        reason: format!("not an absolute URL ({})", e),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(InputValidationError::InvalidField {
            field: "url",
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(InputValidationError::InvalidField {
            field: "url",
            reason: "missing host".to_string(),
        });
    }

    Ok(())
}
