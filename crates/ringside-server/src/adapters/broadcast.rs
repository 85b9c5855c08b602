//! Realtime fan-out over a tokio broadcast channel
//!
//! Canonical [`CallEvent`]s are rendered once into JSON text frames and
//! pushed to every subscriber. The table in [`wire_names`] is the only
//! place that knows which external event names (including legacy
//! aliases) a canonical event is published under.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use ringside::{CallEvent, CallRecord, CallStatus, EventPublisher};

use crate::models::realtime::{
    CallStartedData, PersonaData, StatusChangeData, TranscriptData, WireFrame, ACTIVE_CALLS,
};
use crate::models::{CallView, PersonaPayload, TranscriptSegmentView};

pub const DEFAULT_CAPACITY: usize = 256;

/// External names a canonical event is published under, in send order
pub fn wire_names(event: &CallEvent) -> &'static [&'static str] {
    match event {
        CallEvent::Started(_) => &["call-started"],
        CallEvent::StatusChanged {
            status: CallStatus::InProgress,
            ..
        } => &["call-status-update", "call-started"],
        CallEvent::StatusChanged {
            status: CallStatus::Completed,
            ..
        } => &["call-status-update", "call-ended"],
        CallEvent::StatusChanged { .. } => &["call-status-update"],
        CallEvent::TranscriptAppended { .. } => &["transcript-updated", "transcriptUpdate"],
        CallEvent::PersonaUpdated { .. } => &["persona-updated", "personaUpdated"],
    }
}

fn to_value<T: Serialize>(data: T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(data)
}

/// Payload shared by every wire name of one event
pub fn event_data(event: &CallEvent) -> Result<Value, serde_json::Error> {
    match event {
        CallEvent::Started(record) => to_value(CallStartedData::from(&CallView::from(record))),
        CallEvent::StatusChanged {
            call_id,
            previous,
            status,
            ended_reason,
            origin,
        } => to_value(StatusChangeData {
            call_id: call_id.clone(),
            status: status.to_string(),
            previous_status: previous.to_string(),
            origin: origin.to_string(),
            ended_reason: ended_reason.clone(),
        }),
        CallEvent::TranscriptAppended {
            call_id,
            segment,
            transcript,
        } => to_value(TranscriptData {
            call_id: call_id.clone(),
            segment: TranscriptSegmentView::from(segment),
            transcript: transcript.iter().map(Into::into).collect(),
        }),
        CallEvent::PersonaUpdated { call_id, persona } => to_value(PersonaData {
            call_id: call_id.clone(),
            persona: PersonaPayload::from(persona),
        }),
    }
}

/// Render the connect-time snapshot frame
pub fn snapshot_frame(records: &[CallRecord]) -> Result<String, serde_json::Error> {
    let calls: Vec<CallView> = records.iter().map(CallView::from).collect();
    WireFrame::new(ACTIVE_CALLS, serde_json::to_value(calls)?).to_text()
}

/// Broadcast publisher backed by `tokio::sync::broadcast`
#[derive(Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<String>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New receiver that sees every frame published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: CallEvent) {
        let data = match event_data(&event) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(call_id = %event.call_id(), error = %e, "Failed to encode event");
                return;
            }
        };

        for name in wire_names(&event) {
            let frame = match WireFrame::new(name, data.clone()).to_text() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!(event = name, error = %e, "Failed to encode frame");
                    continue;
                }
            };

            // Err only means nobody is listening right now
            match self.sender.send(frame) {
                Ok(receivers) => {
                    tracing::debug!(call_id = %event.call_id(), event = name, receivers, "Published")
                }
                Err(_) => tracing::trace!(event = name, "No subscribers"),
            }
        }
    }
}
