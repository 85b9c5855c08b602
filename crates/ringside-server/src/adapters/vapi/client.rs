//! Vapi REST Client
//!
//! Implements the three voice-provider ports against the Vapi HTTP API
//! using reqwest.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use ringside::{
    AssistantConfigurator, CallStatusSource, Dialer, DomainError, Persona, PhoneNumber,
    PlacedCall, ProviderCallStatus, ProviderError, ProviderStatus,
};

use super::payloads::{
    AssistantDocument, AssistantPromptUpdate, CallResource, CallStatusResource, CreateCallBody,
    CreatedResource, Customer, PhoneNumberResource,
};

pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_VOICE_ID: &str = "vFLqXa8bgbofGarf6fZh";

/// Connection settings for the Vapi API
#[derive(Debug, Clone)]
pub struct VapiConfig {
    pub api_key: String,
    pub base_url: String,
    /// LLM model id placed in assistant documents
    pub model: String,
    /// Voice used when a persona does not pick one
    pub default_voice_id: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl VapiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            default_voice_id: DEFAULT_VOICE_ID.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Ringside/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_default_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.default_voice_id = voice_id.into();
        self
    }
}

/// HTTP implementation of the voice provider ports
pub struct VapiClient {
    client: Client,
    config: VapiConfig,
}

impl VapiClient {
    pub fn new(config: VapiConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DomainError::provider(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.config.api_key)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response, DomainError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("Failed to {action}: {e}")))?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(provider_error(response, action).await.into())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, DomainError> {
        self.send(request, action)
            .await?
            .json::<T>()
            .await
            .map_err(|e| DomainError::provider(format!("Unexpected response to {action}: {e}")))
    }
}

/// Turn a non-2xx response into a ProviderError, keeping the body as details
async fn provider_error(response: Response, action: &str) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let details = serde_json::from_str::<serde_json::Value>(&body).ok();
    let message = details
        .as_ref()
        .and_then(|d| d.get("message"))
        .and_then(|m| match m {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.clone()
            }
        });

    let error = ProviderError::new(format!("Failed to {action}: {message}")).with_status(status.as_u16());
    match details {
        Some(details) => error.with_details(details),
        None => error,
    }
}

#[async_trait]
impl AssistantConfigurator for VapiClient {
    async fn create_assistant(
        &self,
        persona: &Persona,
        destination: &PhoneNumber,
    ) -> Result<String, DomainError> {
        let document = AssistantDocument::for_persona(persona, destination, &self.config);
        tracing::debug!(
            persona = %persona.display_name(),
            voice_id = %document.voice.voice_id,
            "Creating assistant"
        );

        let created: CreatedResource = self
            .send_json(
                self.client.post(self.url("/assistant")).json(&document),
                "create assistant",
            )
            .await?;

        tracing::info!(assistant_id = %created.id, "Assistant created");
        Ok(created.id)
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        persona: &Persona,
    ) -> Result<(), DomainError> {
        let update = AssistantPromptUpdate {
            system_prompt: persona.update_prompt(),
        };

        self.send(
            self.client
                .patch(self.url(&format!("/assistant/{assistant_id}")))
                .json(&update),
            "update assistant",
        )
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Dialer for VapiClient {
    async fn place_call(
        &self,
        assistant_id: &str,
        phone_number_id: &str,
        destination: &PhoneNumber,
    ) -> Result<PlacedCall, DomainError> {
        let body = CreateCallBody {
            phone_number_id,
            assistant_id,
            customer: Customer {
                number: destination.as_str(),
            },
        };

        let call: CallResource = self
            .send_json(self.client.post(self.url("/call")).json(&body), "place call")
            .await?;

        let (listen_url, control_url) = match call.monitor {
            Some(monitor) => (monitor.listen_url, monitor.control_url),
            None => (None, None),
        };

        Ok(PlacedCall {
            call_id: call.id,
            listen_url,
            control_url,
        })
    }

    async fn default_phone_number_id(&self) -> Result<String, DomainError> {
        let numbers: Vec<PhoneNumberResource> = self
            .send_json(self.client.get(self.url("/phone-number")), "list phone numbers")
            .await?;

        let first = numbers
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("No phone numbers available on the provider account"))?;

        tracing::info!(
            phone_number_id = %first.id,
            number = first.number.as_deref().unwrap_or("-"),
            "Using first provider phone number"
        );
        Ok(first.id)
    }
}

#[async_trait]
impl CallStatusSource for VapiClient {
    async fn fetch_status(&self, call_id: &str) -> Result<ProviderCallStatus, DomainError> {
        let resource: CallStatusResource = self
            .send_json(
                self.client.get(self.url(&format!("/call/{call_id}"))),
                "fetch call status",
            )
            .await?;

        Ok(ProviderCallStatus {
            status: ProviderStatus::from(resource.status.unwrap_or_default()),
            ended_reason: resource.ended_reason,
        })
    }
}
