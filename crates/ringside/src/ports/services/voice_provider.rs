//! Voice Provider Ports
//!
//! The external voice-AI platform is consumed through three narrow
//! collaborators: one builds the assistant, one places the call, one
//! reports call status. A single adapter usually implements all three.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::{Persona, PhoneNumber, ProviderStatus};

/// Result of placing a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedCall {
    pub call_id: String,
    pub listen_url: Option<String>,
    pub control_url: Option<String>,
}

/// Call status as reported by the provider's status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCallStatus {
    pub status: ProviderStatus,
    pub ended_reason: Option<String>,
}

/// Builds and updates the provider-side assistant configuration
///
/// # Example
///
/// ```rust,ignore
/// use ringside::ports::AssistantConfigurator;
///
/// let assistant_id = provider
///     .create_assistant(&Persona::named("Alex"), &destination)
///     .await?;
/// ```
#[async_trait]
pub trait AssistantConfigurator: Send + Sync {
    /// Create an assistant embedding the persona; returns the assistant ID
    async fn create_assistant(
        &self,
        persona: &Persona,
        destination: &PhoneNumber,
    ) -> Result<String, DomainError>;

    /// Push the persona's update prompt to an existing assistant
    async fn update_assistant(&self, assistant_id: &str, persona: &Persona)
        -> Result<(), DomainError>;
}

/// Places outbound calls
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Dial `destination` from the provider number `phone_number_id`
    async fn place_call(
        &self,
        assistant_id: &str,
        phone_number_id: &str,
        destination: &PhoneNumber,
    ) -> Result<PlacedCall, DomainError>;

    /// Provider number to dial from when none is configured
    async fn default_phone_number_id(&self) -> Result<String, DomainError>;
}

/// Queries the provider for the current status of a call
#[async_trait]
pub trait CallStatusSource: Send + Sync {
    async fn fetch_status(&self, call_id: &str) -> Result<ProviderCallStatus, DomainError>;
}
