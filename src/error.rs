use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// The external service an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    GitHub,
    Completion,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::GitHub => write!(f, "GitHub API"),
            Service::Completion => write!(f, "completion API"),
        }
    }
}

/// Errors that can occur during repository analysis
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Malformed GitHub repository URL
    #[error("Invalid GitHub URL format: {0}")]
    InvalidUrl(String),

    /// Invalid request payload (bad focus value, empty question, ...)
    #[error("{0}")]
    InvalidRequest(String),

    /// Rate limit reported by GitHub or the completion service
    #[error("{service} rate limit exceeded: {message}")]
    RateLimited { service: Service, message: String },

    /// Missing or invalid credentials; operator-actionable, never retried
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-2xx reply from an external API
    #[error("Upstream API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Request to the completion service timed out after retries
    #[error("LLM request timed out. Repository may be too large.")]
    Timeout,

    /// Completion output could not be parsed as JSON
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// Completion output parsed but violates the required schema
    #[error("{0}")]
    SchemaViolation(String),

    /// DOCX/PDF rendering failure
    #[error("Document export failed: {0}")]
    ExportFailed(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { service, .. } => match service {
                Service::GitHub => StatusCode::FORBIDDEN,
                Service::Completion => StatusCode::TOO_MANY_REQUESTS,
            },
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::MalformedResponse(_) | Self::SchemaViolation(_) | Self::ExportFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure reflects external-service behavior rather than
    /// caller input
    pub fn is_server_fault(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_) | Self::InvalidRequest(_))
    }
}

impl IntoResponse for AnalyzerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        tracing::error!(status = %status, "request failed: {message}");
        let body = Json(json!({
            "success": false,
            "message": message,
            "error": message,
        }));
        (status, body).into_response()
    }
}
