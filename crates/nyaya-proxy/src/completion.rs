//! Completion proxy: validate, wrap in the legal preamble, forward once.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::gemini::{GeminiClient, GenerateContentRequest, GenerationConfig, UpstreamError};
use crate::prompt;

pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Body of `POST /api/gemini` as sent by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_output_tokens: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCompletion {
    pub prompt: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCompletion {
    #[error("prompt is required and must be a non-empty string")]
    MissingPrompt,

    #[error("temperature must be a number between 0 and 2, got {0}")]
    Temperature(f64),

    #[error("maxOutputTokens must be a positive integer, got {0}")]
    MaxOutputTokens(i64),
}

impl CompletionRequest {
    pub fn validate(self) -> Result<ValidatedCompletion, InvalidCompletion> {
        let prompt = match self.prompt {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(InvalidCompletion::MissingPrompt),
        };

        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(InvalidCompletion::Temperature(temperature));
        }

        let max_output_tokens = match self.max_output_tokens {
            None => DEFAULT_MAX_OUTPUT_TOKENS,
            Some(n) => match u32::try_from(n) {
                Ok(n) if n > 0 => n,
                _ => return Err(InvalidCompletion::MaxOutputTokens(n)),
            },
        };

        Ok(ValidatedCompletion {
            prompt,
            temperature,
            max_output_tokens,
        })
    }
}

impl ValidatedCompletion {
    pub fn to_upstream_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::text(prompt::enhance(&self.prompt)).with_generation_config(
            GenerationConfig::new(self.temperature, self.max_output_tokens),
        )
    }
}

/// Forward a validated completion and hand back the upstream body untouched.
pub async fn complete(
    client: &GeminiClient,
    request: &ValidatedCompletion,
) -> Result<Value, UpstreamError> {
    debug!(
        prompt = %prompt::preview(&request.prompt, 50),
        temperature = request.temperature,
        max_output_tokens = request.max_output_tokens,
        "processing Gemini request"
    );

    let response = client
        .generate_content(&request.to_upstream_request())
        .await?;

    info!("Gemini response received");
    Ok(response)
}
