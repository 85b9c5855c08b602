//! Domain Errors
//!
//! Error types for domain operations.

use serde::Serialize;
use thiserror::Error;

/// Failure reported by (or while talking to) the external voice provider.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    /// HTTP status returned by the provider, if a response arrived at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Provider response body, when it was valid JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// An inbound event referenced a call this process never registered
    #[error("Unknown call: {0}")]
    UnknownCall(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(ProviderError::new(message))
    }
}
