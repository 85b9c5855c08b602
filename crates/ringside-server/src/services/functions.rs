//! Function-call side channel
//!
//! The assistant can invoke tools mid-call; the provider forwards each
//! invocation as a webhook and speaks whatever `result` we answer with.
//! Call records are never touched here.

use serde::Deserialize;
use serde_json::Value;

pub const BOOK_APPOINTMENT: &str = "bookAppointment";

#[derive(Debug, Deserialize)]
struct BookAppointmentParams {
    datetime: String,
}

/// Answers assistant tool invocations
#[derive(Debug, Clone, Default)]
pub struct FunctionCallHandler;

impl FunctionCallHandler {
    pub fn new() -> Self {
        Self
    }

    /// Result text for a function call. Unknown functions get an empty result.
    pub fn handle(&self, name: &str, parameters: &Value) -> String {
        match name {
            BOOK_APPOINTMENT => match parse_params::<BookAppointmentParams>(parameters) {
                Some(params) => {
                    tracing::info!(function = name, datetime = %params.datetime, "Appointment booked");
                    format!(
                        "The appointment was booked successfully for {}.",
                        params.datetime
                    )
                }
                None => {
                    tracing::warn!(function = name, parameters = %parameters, "Invalid parameters");
                    "I could not read the appointment time, please say it again.".to_string()
                }
            },
            other => {
                tracing::warn!(function = other, "Unknown function call");
                String::new()
            }
        }
    }
}

/// Parameters arrive either as a JSON object or as a JSON-encoded string
fn parse_params<T: serde::de::DeserializeOwned>(parameters: &Value) -> Option<T> {
    match parameters {
        Value::String(encoded) => serde_json::from_str(encoded).ok(),
        other => serde_json::from_value(other.clone()).ok(),
    }
}
