//! Server configuration
//!
//! Read from the deployment secret store through a lookup function so the
//! parsing rules can be exercised without a running platform.

use std::time::Duration;
use thiserror::Error;

use crate::adapters::broadcast::DEFAULT_CAPACITY;
use crate::adapters::vapi::{VapiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_VOICE_ID};
use crate::application::DEFAULT_POLL_DELAY;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required secret {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub vapi_api_key: String,
    pub vapi_base_url: String,
    /// Provider number to dial from; discovered at first call when unset
    pub vapi_phone_number_id: Option<String>,
    pub vapi_model: String,
    pub vapi_default_voice_id: String,
    pub poll_delay: Duration,
    pub broadcast_capacity: usize,
    /// Bearer key for the `/calls` routes; unset disables auth
    pub api_key: Option<String>,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let vapi_api_key = get("VAPI_API_KEY").ok_or(ConfigError::Missing("VAPI_API_KEY"))?;

        let poll_delay = match get("POLL_DELAY_SECS") {
            Some(raw) => Duration::from_secs(parse_number("POLL_DELAY_SECS", &raw)?),
            None => DEFAULT_POLL_DELAY,
        };

        let broadcast_capacity = match get("BROADCAST_CAPACITY") {
            Some(raw) => {
                let capacity: usize = parse_number("BROADCAST_CAPACITY", &raw)?;
                if capacity == 0 {
                    return Err(ConfigError::Invalid {
                        key: "BROADCAST_CAPACITY",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                capacity
            }
            None => DEFAULT_CAPACITY,
        };

        Ok(Self {
            vapi_api_key,
            vapi_base_url: get("VAPI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            vapi_phone_number_id: get("VAPI_PHONE_NUMBER_ID"),
            vapi_model: get("VAPI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            vapi_default_voice_id: get("VAPI_DEFAULT_VOICE_ID")
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            poll_delay,
            broadcast_capacity,
            api_key: get("RINGSIDE_API_KEY"),
        })
    }

    pub fn vapi(&self) -> VapiConfig {
        VapiConfig::new(&self.vapi_api_key)
            .with_base_url(&self.vapi_base_url)
            .with_model(&self.vapi_model)
            .with_default_voice(&self.vapi_default_voice_id)
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
