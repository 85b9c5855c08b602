//! Call events - Inbound status updates and outbound state-change notifications

use serde::{Deserialize, Serialize};

use super::{CallRecord, Persona, TranscriptSegment};
use crate::domain::value_objects::{CallStatus, EventOrigin, ProviderStatus};

/// A status report about a call, from a webhook delivery or a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub call_id: String,
    pub provider_status: ProviderStatus,
    pub ended_reason: Option<String>,
    pub origin: EventOrigin,
}

impl StatusUpdate {
    pub fn new(
        call_id: impl Into<String>,
        provider_status: impl Into<ProviderStatus>,
        origin: EventOrigin,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            provider_status: provider_status.into(),
            ended_reason: None,
            origin,
        }
    }

    pub fn webhook(call_id: impl Into<String>, provider_status: impl Into<ProviderStatus>) -> Self {
        Self::new(call_id, provider_status, EventOrigin::Webhook)
    }

    pub fn poll(call_id: impl Into<String>, provider_status: impl Into<ProviderStatus>) -> Self {
        Self::new(call_id, provider_status, EventOrigin::Poll)
    }

    pub fn with_ended_reason(mut self, ended_reason: Option<String>) -> Self {
        self.ended_reason = ended_reason;
        self
    }
}

/// Canonical notification emitted for every accepted mutation
///
/// How these are named on the wire is an adapter concern.
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    /// A call was placed and registered
    Started(CallRecord),
    StatusChanged {
        call_id: String,
        previous: CallStatus,
        status: CallStatus,
        ended_reason: Option<String>,
        origin: EventOrigin,
    },
    TranscriptAppended {
        call_id: String,
        segment: TranscriptSegment,
        /// Full transcript including `segment`
        transcript: Vec<TranscriptSegment>,
    },
    PersonaUpdated {
        call_id: String,
        persona: Persona,
    },
}

impl CallEvent {
    pub fn call_id(&self) -> &str {
        match self {
            CallEvent::Started(record) => &record.id,
            CallEvent::StatusChanged { call_id, .. }
            | CallEvent::TranscriptAppended { call_id, .. }
            | CallEvent::PersonaUpdated { call_id, .. } => call_id,
        }
    }
}
