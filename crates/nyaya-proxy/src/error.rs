//! HTTP-facing error type. Every handler failure becomes a JSON body
//! `{error, message, ...}` with a matching status code.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::completion::InvalidCompletion;
use crate::gemini::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { error: String, message: String },

    #[error("{message}")]
    NotFound { error: String, message: String },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Generic 404 for a path nothing is mounted on.
    pub fn route_not_found(path: &str) -> Self {
        Self::not_found(
            "Not found",
            format!("The resource at {} was not found", path),
        )
    }

    fn error_label(&self) -> &str {
        match self {
            Self::BadRequest { error, .. } | Self::NotFound { error, .. } => error,
            Self::Upstream(_) => "Failed to process request",
            Self::Internal(_) => "Internal server error",
        }
    }
}

impl From<InvalidCompletion> for ApiError {
    fn from(err: InvalidCompletion) -> Self {
        Self::bad_request("Invalid request", err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (status, status_text, details) = match self {
            Self::Upstream(err) => (err.status(), err.status_text(), err.details()),
            _ => (None, None, None),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.error_label(),
            message: self.to_string(),
            status,
            status_text,
            details,
        })
    }
}

/// Maps extractor failures (bad JSON, wrong field types, oversized body) to 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request("Invalid request body", err.to_string()).into()
}
