//! Call DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ringside::{CallRecord, Persona, TranscriptSegment};

/// Persona fields accepted from and returned to API clients
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonaPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Voice id at the speech-synthesis provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
}

impl From<PersonaPayload> for Persona {
    fn from(payload: PersonaPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            voice_id: payload.voice_id,
            first_message: payload.first_message,
        }
    }
}

impl From<&Persona> for PersonaPayload {
    fn from(persona: &Persona) -> Self {
        Self {
            name: persona.name.clone(),
            description: persona.description.clone(),
            voice_id: persona.voice_id.clone(),
            first_message: persona.first_message.clone(),
        }
    }
}

/// One transcript utterance
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegmentView {
    pub speaker: String,
    pub text: String,
    /// Time the segment reached this server
    pub timestamp: DateTime<Utc>,
}

impl From<&TranscriptSegment> for TranscriptSegmentView {
    fn from(segment: &TranscriptSegment) -> Self {
        Self {
            speaker: segment.speaker.clone(),
            text: segment.text.clone(),
            timestamp: segment.timestamp,
        }
    }
}

/// Call record as exposed over HTTP and the realtime channel
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallView {
    pub id: String,
    pub phone_number: String,
    pub persona: PersonaPayload,
    /// One of `initiated`, `in-progress`, `completed`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
    pub transcript: Vec<TranscriptSegmentView>,
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&CallRecord> for CallView {
    fn from(record: &CallRecord) -> Self {
        Self {
            id: record.id.clone(),
            phone_number: record.phone_number.to_string(),
            persona: PersonaPayload::from(&record.persona),
            status: record.status.to_string(),
            ended_reason: record.ended_reason.clone(),
            transcript: record.transcript.iter().map(Into::into).collect(),
            assistant_id: record.assistant_id.clone(),
            listen_url: record.listen_url.clone(),
            control_url: record.control_url.clone(),
            created_at: record.created_at,
        }
    }
}

impl From<CallRecord> for CallView {
    fn from(record: CallRecord) -> Self {
        Self::from(&record)
    }
}

// ============================================
// Request/Response DTOs
// ============================================

/// Place an outbound call
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallRequest {
    /// Destination in E.164 form, e.g. `+15551234567`
    pub phone_number: String,
    #[serde(default)]
    pub persona: Option<PersonaPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallResponse {
    pub success: bool,
    pub call_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CallListResponse {
    pub success: bool,
    pub calls: Vec<CallView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CallDetailResponse {
    pub success: bool,
    pub call: CallView,
}

/// Result of an out-of-band provider status check
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub call: CallView,
    /// Raw status reported by the provider
    pub provider_status: String,
    /// Whether the check moved the stored status forward
    pub updated: bool,
}

/// Replace the persona of a placed call
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePersonaRequest {
    pub persona: PersonaPayload,
}

/// Bare success acknowledgment
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
