//! Google Gemini `generateContent` client.
//!
//! Only the single-turn text subset of the API is modelled on the request
//! side. Responses are kept as raw JSON so callers can relay them verbatim.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::ServerConfig;

pub const TOP_P: f64 = 0.8;
pub const TOP_K: u32 = 40;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        status_text: String,
        body: Value,
    },

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("Invalid API response structure")]
    MalformedShape(Value),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        match self {
            Self::Status { status_text, .. } => Some(status_text),
            _ => None,
        }
    }

    /// Upstream body attached to the failure, if the upstream sent one.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } | Self::MalformedShape(body) => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_p: f64,
    pub top_k: u32,
}

impl GenerationConfig {
    /// Caller-tunable fields; `topP`/`topK` are pinned.
    pub fn new(temperature: f64, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            max_output_tokens,
            top_p: TOP_P,
            top_k: TOP_K,
        }
    }
}

impl GenerateContentRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
            generation_config: None,
        }
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// True when `candidates[0].content.parts[0]` is present.
pub fn has_candidate_part(response: &Value) -> bool {
    response
        .pointer("/candidates/0/content/parts/0")
        .is_some_and(|part| !part.is_null())
}

pub struct GeminiClient {
    client: Client,
    url: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(config: &ServerConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.generate_content_url(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and return the decoded JSON body of a 2xx answer.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Gemini responded");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            error!(%status, body = %body, "Gemini API error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}
