//! Provider webhook payloads
//!
//! Two envelope styles arrive on the same endpoint: the `event`-style
//! lifecycle payloads (`{event, call, transcript}`) and the provider's
//! server-message envelope (`{message: {type, call, ...}}`). Both are
//! normalised into [`WebhookEvent`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use ringside::StatusUpdate;

/// Normalised inbound webhook
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// Synchronous tool invocation; answered with `{result}`
    FunctionCall { name: String, parameters: Value },
    Status(StatusUpdate),
    Transcript {
        call_id: String,
        speaker: String,
        text: String,
    },
    /// Nothing to apply; the reason is only logged
    Ignored(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    event: Option<String>,
    call: Option<CallRef>,
    transcript: Option<TranscriptBody>,
    message: Option<ServerMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallRef {
    id: Option<String>,
    ended_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptBody {
    speaker: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerMessage {
    #[serde(rename = "type")]
    kind: Option<String>,
    call: Option<CallRef>,
    status: Option<String>,
    ended_reason: Option<String>,
    role: Option<String>,
    transcript: Option<String>,
    transcript_type: Option<String>,
    function_call: Option<FunctionCallBody>,
}

#[derive(Debug, Deserialize)]
struct FunctionCallBody {
    name: String,
    #[serde(default)]
    parameters: Value,
}

fn call_id(call: &Option<CallRef>) -> Option<String> {
    call.as_ref()
        .and_then(|c| c.id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl WebhookEvent {
    /// Parse a raw request body. Never fails: anything unusable becomes `Ignored`.
    pub fn parse(body: &[u8]) -> Self {
        match serde_json::from_slice::<Envelope>(body) {
            Ok(envelope) => Self::from_envelope(envelope),
            Err(e) => WebhookEvent::Ignored(format!("malformed payload: {e}")),
        }
    }

    fn from_envelope(envelope: Envelope) -> Self {
        if let Some(message) = envelope.message {
            return Self::from_server_message(message);
        }

        let Some(event) = envelope.event else {
            return WebhookEvent::Ignored("no event or message type".to_string());
        };
        let Some(id) = call_id(&envelope.call) else {
            return WebhookEvent::Ignored(format!("{event} without call id"));
        };

        match event.as_str() {
            "call.started" => WebhookEvent::Status(StatusUpdate::webhook(id, "in-progress")),
            "call.ended" | "call-ended" => {
                let reason = envelope.call.and_then(|c| c.ended_reason);
                WebhookEvent::Status(StatusUpdate::webhook(id, "ended").with_ended_reason(reason))
            }
            "transcript.updated" => match envelope.transcript {
                Some(TranscriptBody {
                    speaker: Some(speaker),
                    text: Some(text),
                }) => WebhookEvent::Transcript {
                    call_id: id,
                    speaker,
                    text,
                },
                _ => WebhookEvent::Ignored("transcript.updated without speaker/text".to_string()),
            },
            other => WebhookEvent::Ignored(format!("unhandled event {other}")),
        }
    }

    fn from_server_message(message: ServerMessage) -> Self {
        let kind = message.kind.clone().unwrap_or_default();

        if kind == "function-call" {
            return match message.function_call {
                Some(call) => WebhookEvent::FunctionCall {
                    name: call.name,
                    parameters: call.parameters,
                },
                None => WebhookEvent::Ignored("function-call without functionCall".to_string()),
            };
        }

        let Some(id) = call_id(&message.call) else {
            return WebhookEvent::Ignored(format!("{kind} message without call id"));
        };

        match kind.as_str() {
            "status-update" => match message.status {
                Some(status) => WebhookEvent::Status(
                    StatusUpdate::webhook(id, status).with_ended_reason(message.ended_reason),
                ),
                None => WebhookEvent::Ignored("status-update without status".to_string()),
            },
            "end-of-call-report" => WebhookEvent::Status(
                StatusUpdate::webhook(id, "ended").with_ended_reason(message.ended_reason),
            ),
            "transcript" => {
                if message
                    .transcript_type
                    .as_deref()
                    .is_some_and(|t| t != "final")
                {
                    return WebhookEvent::Ignored("partial transcript".to_string());
                }
                match (message.role, message.transcript) {
                    (Some(speaker), Some(text)) => WebhookEvent::Transcript {
                        call_id: id,
                        speaker,
                        text,
                    },
                    _ => WebhookEvent::Ignored("transcript without role/text".to_string()),
                }
            }
            other => WebhookEvent::Ignored(format!("unhandled message type {other}")),
        }
    }
}

/// Answer to a function-call webhook
#[derive(Debug, Serialize, ToSchema)]
pub struct FunctionCallResult {
    pub result: String,
}
