//! Proxy failures and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Why a file could not be served.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The requested id is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid file id '{0}'")]
    InvalidId(String),

    /// The upstream did not answer within the configured timeout.
    #[error("upstream request timed out")]
    Timeout,

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}")]
    Upstream {
        /// Status as reported by the upstream.
        status: u16,
    },

    /// The body exceeded the configured size limit.
    #[error("upstream response exceeds {limit} bytes")]
    TooLarge {
        /// Configured maximum, in bytes.
        limit: u64,
    },

    /// The configured template does not produce a usable URL.
    #[error("invalid upstream url: {0}")]
    InvalidUpstream(#[from] url::ParseError),

    /// Any other transport failure.
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl ProxyError {
    /// Classifies a transport error.
    pub fn from_request(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(error)
        }
    }

    /// HTTP status returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { status } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            Self::TooLarge { .. } | Self::InvalidUpstream(_) | Self::Request(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(status = status.as_u16(), error = %self, "File fetch failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::InvalidId("a/b".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ProxyError::Upstream { status: 404 }.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ProxyError::Upstream { status: 403 }.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ProxyError::TooLarge { limit: 10 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_nonsense_upstream_status_becomes_bad_gateway() {
        assert_eq!(ProxyError::Upstream { status: 42 }.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_into_response_uses_mapped_status() {
        let response = ProxyError::Timeout.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
