//! Vapi REST request and response bodies

use serde::{Deserialize, Serialize};

use ringside::{Persona, PhoneNumber};

use super::VapiConfig;

/// Assistant document sent to `POST /assistant`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantDocument {
    pub transcriber: Transcriber,
    pub model: ModelConfig,
    pub voice: VoiceConfig,
    pub voicemail_message: String,
    pub first_message: String,
    pub end_call_message: String,
    pub silence_timeout_seconds: u32,
    pub end_call_function_enabled: bool,
    pub max_duration_seconds: u32,
    pub recording_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct Transcriber {
    pub provider: &'static str,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelConfig {
    pub provider: &'static str,
    pub model: String,
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ModelTool>,
}

#[derive(Debug, Serialize)]
pub struct ModelMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ModelTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: &'static str,
    pub voice_id: String,
}

impl AssistantDocument {
    pub fn for_persona(persona: &Persona, destination: &PhoneNumber, config: &VapiConfig) -> Self {
        let voice_id = persona
            .voice_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(config.default_voice_id.as_str())
            .to_string();

        Self {
            transcriber: Transcriber {
                provider: "deepgram",
                keywords: vec![format!("{}:1", persona.display_name())],
            },
            model: ModelConfig {
                provider: "openai",
                model: config.model.clone(),
                messages: vec![ModelMessage {
                    role: "system",
                    content: persona.system_prompt(destination.as_str()),
                }],
                tools: vec![
                    ModelTool {
                        kind: "endCall",
                        is_async: None,
                    },
                    ModelTool {
                        kind: "dtmf",
                        is_async: Some(true),
                    },
                ],
            },
            voice: VoiceConfig {
                provider: "11labs",
                voice_id,
            },
            voicemail_message: persona.voicemail_message(),
            first_message: persona.opening_line(),
            end_call_message: "Thank you for your time. Goodbye!".to_string(),
            silence_timeout_seconds: 300,
            end_call_function_enabled: false,
            max_duration_seconds: 43200,
            recording_enabled: true,
        }
    }
}

/// Body for `PATCH /assistant/{id}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantPromptUpdate {
    pub system_prompt: String,
}

/// Body for `POST /call`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallBody<'a> {
    pub phone_number_id: &'a str,
    pub assistant_id: &'a str,
    pub customer: Customer<'a>,
}

#[derive(Debug, Serialize)]
pub struct Customer<'a> {
    pub number: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreatedResource {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CallResource {
    pub id: String,
    #[serde(default)]
    pub monitor: Option<Monitor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub listen_url: Option<String>,
    pub control_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStatusResource {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ended_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhoneNumberResource {
    pub id: String,
    #[serde(default)]
    pub number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_document_shape() {
        let config = VapiConfig::new("key");
        let persona = Persona::named("Alex").with_voice("voice-42");
        let destination = PhoneNumber::parse("+15551234567").unwrap();

        let json =
            serde_json::to_value(AssistantDocument::for_persona(&persona, &destination, &config))
                .unwrap();

        assert_eq!(json["transcriber"]["keywords"][0], "Alex:1");
        assert_eq!(json["model"]["model"], "gpt-4");
        assert_eq!(json["model"]["messages"][0]["role"], "system");
        assert_eq!(json["model"]["tools"][0], serde_json::json!({"type": "endCall"}));
        assert_eq!(
            json["model"]["tools"][1],
            serde_json::json!({"type": "dtmf", "async": true})
        );
        assert_eq!(json["voice"]["voiceId"], "voice-42");
        assert_eq!(json["silenceTimeoutSeconds"], 300);
        assert_eq!(json["maxDurationSeconds"], 43200);
        assert_eq!(json["recordingEnabled"], true);
        assert_eq!(
            json["firstMessage"],
            "Hello, this is Alex, how are you doing today?"
        );
    }

    #[test]
    fn test_default_voice_when_persona_has_none() {
        let config = VapiConfig::new("key").with_default_voice("fallback-voice");
        let destination = PhoneNumber::parse("+15551234567").unwrap();

        let doc = AssistantDocument::for_persona(&Persona::default(), &destination, &config);
        assert_eq!(doc.voice.voice_id, "fallback-voice");
    }
}
