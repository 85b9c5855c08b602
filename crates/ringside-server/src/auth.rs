//! Simple API Key Authentication (Bearer Token)

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::routes::error::ApiError;

/// Key guarding the `/calls` routes; `None` disables authentication
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAuth {
    key: Option<Arc<str>>,
}

impl ApiKeyAuth {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.trim().is_empty()).map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }
}

/// Authentication middleware
/// Validates Bearer token against the API key
pub async fn auth_middleware(
    State(auth): State<ApiKeyAuth>,
    request: Request,
    next: Next,
) -> Response {
    let Some(api_key) = auth.key.as_deref() else {
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) if token == api_key => next.run(request).await,
        Some(_) => {
            tracing::warn!("Invalid API key attempted");
            ApiError::unauthorized("Invalid API key").into_response()
        }
        None => {
            tracing::warn!("Missing or malformed Authorization header");
            ApiError::unauthorized("Missing bearer token").into_response()
        }
    }
}
