//! API error envelope
//!
//! Every failing handler answers `{success: false, error, details?}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use ringside::DomainError;

use crate::models::ErrorResponse;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::bad_request(msg),
            DomainError::NotFound { .. } | DomainError::UnknownCall(_) => {
                Self::new(StatusCode::NOT_FOUND, "Call not found")
            }
            DomainError::Provider(e) => {
                tracing::warn!(status = ?e.status, error = %e.message, "Provider request failed");
                let details = e.details.clone();
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    error: e.message,
                    details,
                }
            }
            DomainError::Repository(msg) => {
                tracing::error!(error = %msg, "Call store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}
