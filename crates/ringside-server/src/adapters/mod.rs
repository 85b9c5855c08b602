//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod broadcast;
pub mod memory;
pub mod vapi;

// Re-exports
pub use broadcast::BroadcastPublisher;
pub use memory::InMemoryCallRepository;
pub use vapi::{VapiClient, VapiConfig};
