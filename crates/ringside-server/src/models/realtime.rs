//! Realtime channel frames
//!
//! Every frame is a JSON text message `{"event": <name>, "data": <payload>}`.

use serde::Serialize;
use serde_json::Value;

use super::{CallView, PersonaPayload, TranscriptSegmentView};

/// Snapshot frame sent once per connection
pub const ACTIVE_CALLS: &str = "active-calls";

#[derive(Debug, Serialize)]
pub struct WireFrame<'a> {
    pub event: &'a str,
    pub data: Value,
}

impl<'a> WireFrame<'a> {
    pub fn new(event: &'a str, data: Value) -> Self {
        Self { event, data }
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `call-started` for a freshly registered call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStartedData {
    pub call_id: String,
    pub phone_number: String,
    pub persona: PersonaPayload,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_url: Option<String>,
}

impl From<&CallView> for CallStartedData {
    fn from(call: &CallView) -> Self {
        Self {
            call_id: call.id.clone(),
            phone_number: call.phone_number.clone(),
            persona: call.persona.clone(),
            status: call.status.clone(),
            listen_url: call.listen_url.clone(),
            control_url: call.control_url.clone(),
        }
    }
}

/// Payload of `call-status-update`, `call-ended` and transition-driven `call-started`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeData {
    pub call_id: String,
    pub status: String,
    pub previous_status: String,
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptData {
    pub call_id: String,
    pub segment: TranscriptSegmentView,
    pub transcript: Vec<TranscriptSegmentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaData {
    pub call_id: String,
    pub persona: PersonaPayload,
}
