//! Vapi voice provider adapter

mod client;
mod payloads;

pub use client::{VapiClient, VapiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_VOICE_ID};
