//! Ringside API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Preset;

/// API Client for a Ringside server
pub struct RingsideClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
}

impl From<Preset> for PersonaBody {
    fn from(preset: Preset) -> Self {
        Self {
            name: preset.name,
            description: preset.description,
            voice_id: preset.voice_id,
            first_message: preset.first_message,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCallRequest<'a> {
    phone_number: &'a str,
    persona: &'a PersonaBody,
}

#[derive(Debug, Serialize)]
struct UpdatePersonaRequest<'a> {
    persona: &'a PersonaBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallResponse {
    pub call_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: String,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSummary {
    pub id: String,
    pub phone_number: String,
    #[serde(default)]
    pub persona: PersonaBody,
    pub status: String,
    pub ended_reason: Option<String>,
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
    pub listen_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
struct CallListResponse {
    calls: Vec<CallSummary>,
}

#[derive(Debug, Deserialize)]
struct CallDetailResponse {
    call: CallSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub call: CallSummary,
    pub provider_status: String,
    pub updated: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl RingsideClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn call_url(&self, id: &str, suffix: &str) -> String {
        format!(
            "{}/calls/{}{}",
            self.base_url,
            urlencoding::encode(id),
            suffix
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        let resp = request
            .send()
            .await
            .context("Failed to connect to Ringside API")?;

        decode(resp).await
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Check the key against a protected route
    pub async fn check_key(&self) -> Result<()> {
        self.list_calls().await.map(|_| ())
    }

    pub async fn create_call(&self, phone_number: &str, persona: &PersonaBody) -> Result<String> {
        let url = format!("{}/calls", self.base_url);
        let body = CreateCallRequest {
            phone_number,
            persona,
        };
        let resp: CreateCallResponse = self.send(self.client.post(&url).json(&body)).await?;
        Ok(resp.call_id)
    }

    pub async fn list_calls(&self) -> Result<Vec<CallSummary>> {
        let url = format!("{}/calls", self.base_url);
        let resp: CallListResponse = self.send(self.client.get(&url)).await?;
        Ok(resp.calls)
    }

    pub async fn get_call(&self, id: &str) -> Result<CallSummary> {
        let resp: CallDetailResponse = self.send(self.client.get(self.call_url(id, ""))).await?;
        Ok(resp.call)
    }

    pub async fn refresh_call(&self, id: &str) -> Result<RefreshResponse> {
        self.send(self.client.get(self.call_url(id, "/refresh")))
            .await
    }

    pub async fn update_persona(&self, id: &str, persona: &PersonaBody) -> Result<CallSummary> {
        let body = UpdatePersonaRequest { persona };
        let resp: CallDetailResponse = self
            .send(self.client.post(self.call_url(id, "/persona")).json(&body))
            .await?;
        Ok(resp.call)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        bail!("API error ({}): {}", status, message);
    }

    resp.json().await.context("Failed to parse response")
}
