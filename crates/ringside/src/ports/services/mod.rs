//! Service Ports
//!
//! Interfaces to the external voice provider.

mod voice_provider;

pub use voice_provider::*;
