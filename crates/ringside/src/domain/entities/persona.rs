//! Persona - Who the assistant pretends to be on the call
//!
//! Pure domain entity. Every field is optional; the accessors fall back to
//! defaults so a bare `{}` persona still yields a usable assistant.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PERSONA_NAME: &str = "Alex";
pub const DEFAULT_PERSONA_DESCRIPTION: &str = "a friendly and curious caller";

/// Persona configuration for the assistant placing the call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Voice selection at the speech-synthesis provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
}

impl Persona {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    pub fn with_first_message(mut self, first_message: impl Into<String>) -> Self {
        self.first_message = Some(first_message.into());
        self
    }

    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(DEFAULT_PERSONA_NAME)
    }

    pub fn display_description(&self) -> &str {
        non_blank(&self.description).unwrap_or(DEFAULT_PERSONA_DESCRIPTION)
    }

    /// System prompt for a freshly created assistant calling `phone_number`
    pub fn system_prompt(&self, phone_number: &str) -> String {
        format!(
            "You are {}, {}. You are making a phone call to {}.\n\n\
             Stay in character for the whole conversation. Speak naturally, keep \
             your answers short, and ask the other person to repeat themselves if \
             you did not understand them. Never mention that you are an AI \
             assistant or that this call is automated.",
            self.display_name(),
            self.display_description(),
            phone_number
        )
    }

    /// Replacement prompt pushed to a live assistant when the persona changes mid-call
    pub fn update_prompt(&self) -> String {
        format!(
            "You are {}. {}. Continue your phone conversation naturally.",
            self.display_name(),
            self.display_description()
        )
    }

    pub fn opening_line(&self) -> String {
        match non_blank(&self.first_message) {
            Some(message) => message.to_string(),
            None => format!(
                "Hello, this is {}, how are you doing today?",
                self.display_name()
            ),
        }
    }

    pub fn voicemail_message(&self) -> String {
        format!(
            "Hi, this is {} calling. Please call back when you have a chance.",
            self.display_name()
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
