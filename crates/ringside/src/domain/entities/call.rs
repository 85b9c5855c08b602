//! CallRecord - Authoritative state of one outbound call
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Persona;
use crate::domain::value_objects::{CallStatus, PhoneNumber};

/// One utterance in a call transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub speaker: String,
    pub text: String,
    /// Receipt time at this server, not provider time
    pub timestamp: DateTime<Utc>,
}

impl TranscriptSegment {
    pub fn received_now(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// CallRecord - Everything known about a call placed by this process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Provider-assigned call identifier
    pub id: String,
    pub phone_number: PhoneNumber,
    pub persona: Persona,
    pub status: CallStatus,
    /// Only ever set on the transition to `Completed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
    pub transcript: Vec<TranscriptSegment>,
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CallRecord {
    /// Create a freshly placed call in the `Initiated` state
    pub fn new(
        id: impl Into<String>,
        phone_number: PhoneNumber,
        persona: Persona,
        assistant_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            phone_number,
            persona,
            status: CallStatus::Initiated,
            ended_reason: None,
            transcript: Vec::new(),
            assistant_id: assistant_id.into(),
            listen_url: None,
            control_url: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the provider's live monitoring URLs
    pub fn with_monitor(mut self, listen_url: Option<String>, control_url: Option<String>) -> Self {
        self.listen_url = listen_url;
        self.control_url = control_url;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }
}
