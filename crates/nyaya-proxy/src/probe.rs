//! Capability probe: a throwaway prompt that checks the upstream answers
//! with a usable shape.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::gemini::{has_candidate_part, GeminiClient, GenerateContentRequest, UpstreamError};
use crate::libraries::{LibraryAvailability, LibraryChecker};

pub const PROBE_PROMPT: &str = "Respond with only the word: Connected";
const NO_DETAILS: &str = "No additional details";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeFailure {
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    /// Upstream answered 2xx.
    pub reachable: bool,
    /// Reachable and the answer had `candidates[0].content.parts[0]`.
    pub healthy: bool,
    pub libraries: LibraryAvailability,
    pub error: Option<ProbeFailure>,
}

impl ProbeReport {
    fn failed(reachable: bool, libraries: LibraryAvailability, err: &UpstreamError) -> Self {
        Self {
            reachable,
            healthy: false,
            libraries,
            error: Some(ProbeFailure {
                message: err.to_string(),
                details: err
                    .details()
                    .cloned()
                    .unwrap_or_else(|| Value::String(NO_DETAILS.to_string())),
            }),
        }
    }
}

pub async fn probe(client: &GeminiClient, checker: &LibraryChecker) -> ProbeReport {
    let libraries = checker.check_libraries();
    let request = GenerateContentRequest::text(PROBE_PROMPT);

    match client.generate_content(&request).await {
        Ok(body) if has_candidate_part(&body) => {
            info!("API health check successful");
            ProbeReport {
                reachable: true,
                healthy: true,
                libraries,
                error: None,
            }
        }
        Ok(body) => {
            error!(response = %body, "invalid API response structure");
            ProbeReport::failed(true, libraries, &UpstreamError::MalformedShape(body))
        }
        Err(err) => {
            error!(error = %err, "API health check failed");
            let reachable = matches!(err, UpstreamError::InvalidBody(_));
            ProbeReport::failed(reachable, libraries, &err)
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub api_accessible: bool,
    pub upstream_reachable: bool,
    pub libraries: LibraryAvailability,
}

impl From<ProbeReport> for HealthResponse {
    fn from(report: ProbeReport) -> Self {
        let (message, details) = match report.error {
            Some(failure) => (Some(failure.message), Some(failure.details)),
            None => (None, None),
        };
        Self {
            status: if report.healthy { "ok" } else { "error" },
            message,
            details,
            api_accessible: report.healthy,
            upstream_reachable: report.reachable,
            libraries: report.libraries,
        }
    }
}
