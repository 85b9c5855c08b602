//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (storage, voice provider, subscribers).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod events;
pub mod repositories;
pub mod services;

// Re-exports
pub use events::*;
pub use repositories::*;
pub use services::*;
