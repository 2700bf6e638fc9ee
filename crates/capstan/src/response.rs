//! The response produced by endpoint dispatch.

use http::StatusCode;
use serde_json::{json, Value};

/// A status code plus an optional JSON body.
///
/// The host adapter turns this into its own response type; nothing here is
/// tied to a particular server stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Response status.
    pub status: StatusCode,
    /// JSON body, or `None` for an empty response.
    pub body: Option<Value>,
}

impl ApiResponse {
    /// A 200 response with a JSON body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    /// A response with an explicit status and a JSON body.
    #[must_use]
    pub fn with_status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// A 204 response with no body.
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    /// A 400 response with the standard error payload.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    /// A 404 response with the standard error payload.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(StatusCode::NOT_FOUND, message)
    }

    /// A 405 response with the standard error payload.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::error(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// A 500 response with the standard error payload.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// An error response in the standard `{"error", "message"}` shape.
    #[must_use]
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(json!({
                "error": status.canonical_reason().unwrap_or("Error"),
                "message": message.into(),
            })),
        }
    }

    /// True when the status is a success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
