//! Aggregator error types with HTTP status code mapping.
//!
//! [`AggregatorError`] is the central error type for the service. Scrape
//! errors (transport, format, timeout) are caught at the orchestrator
//! boundary and recorded per source; API-facing variants map to a
//! specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: buy must be lower than sell",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Central error enum for scraping, validation, and the REST layer.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                |
/// |-----------|-----------------------|----------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request            |
/// | 2000–2999 | Auth / Not Found      | 401 / 403 / 404            |
/// | 3000–3999 | Server                | 500 Internal Server Error  |
/// | 4000–4999 | Scrape (source-level) | 502 Bad Gateway            |
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    /// Network or HTTP failure while talking to a bank endpoint or the
    /// WebDriver endpoint (non-2xx, DNS, connection, request timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The source response did not have the expected shape: absent JSON
    /// keys, no matching selector, no allow-listed rows, or an
    /// unparseable numeric string.
    #[error("format error: {0}")]
    Format(String),

    /// A headless-browser wait exceeded its deadline.
    #[error("browser wait timed out: {0}")]
    Timeout(String),

    /// The request carried no usable credentials.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// The actor is not permitted to perform the action.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Request payload failed validation.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AggregatorError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Unauthenticated(_) => 2001,
            Self::Authorization(_) => 2002,
            Self::NotFound(_) => 2003,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Transport(_) => 4001,
            Self::Format(_) => 4002,
            Self::Timeout(_) => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transport(_) | Self::Format(_) | Self::Timeout(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short class label used in run reports and structured logs.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Format(_) => "format",
            Self::Timeout(_) => "timeout",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Authorization(_) => "authorization",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "persistence",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for AggregatorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<sqlx::Error> for AggregatorError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for AggregatorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_variants_have_scrape_classes() {
        assert_eq!(AggregatorError::Transport("dns".into()).class(), "transport");
        assert_eq!(AggregatorError::Format("no rows".into()).class(), "format");
        assert_eq!(AggregatorError::Timeout("45s".into()).class(), "timeout");
    }

    #[test]
    fn authorization_maps_to_forbidden() {
        let err = AggregatorError::Authorization("wrong city".into());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), 2002);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AggregatorError::Validation("buy >= sell".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn scrape_errors_map_to_bad_gateway() {
        assert_eq!(
            AggregatorError::Transport("503".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AggregatorError::Timeout("wait".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
