// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a single surface for callers to match on.

use serde::Deserialize;

/// Error raised by the request pipeline.
///
/// Every failure a caller can observe ends up as one of these variants,
/// whether it started as a backend rejection, a transport fault, or a
/// check made before any request was sent.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend rejected the request with a structured error body.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Non-success response without a usable structured body.
    #[error("HTTP {0}")]
    Http(u16),

    /// Transport failure: connect, DNS, TLS, timeout.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A body that declared JSON could not be encoded or decoded.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the request got far enough
    /// to receive a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Http(status) => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code.
    ///
    /// Structured backend errors carry the backend's own code. Responses
    /// without one report `HTTP_ERROR`.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Api { code, .. } => Some(code),
            ApiError::Http(_) => Some("HTTP_ERROR"),
            _ => None,
        }
    }
}

/// Wire shape of a structured error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub success: bool,
    pub error: ApiErrorDetail,
}

/// The `error` object inside a structured error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_uses_backend_message() {
        let err = ApiError::Api {
            status: 404,
            code: "LEAD_NOT_FOUND".to_string(),
            message: "Lead nao encontrado".to_string(),
            details: None,
        };
        assert_eq!(err.to_string(), "Lead nao encontrado");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), Some("LEAD_NOT_FOUND"));
    }

    #[test]
    fn test_http_error_reports_generic_code() {
        let err = ApiError::Http(502);
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.code(), Some("HTTP_ERROR"));
    }

    #[test]
    fn test_error_body_parses_with_details() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"success":false,"error":{"code":"VALIDATION_ERROR","message":"bad phone","details":{"field":"phone"}}}"#,
        )
        .expect("body should parse");
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert_eq!(body.error.details.unwrap()["field"], "phone");
    }

    #[test]
    fn test_error_body_details_optional() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"success":false,"error":{"code":"X","message":"y"}}"#)
                .expect("body should parse");
        assert!(body.error.details.is_none());
    }
}
