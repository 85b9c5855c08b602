//! Ringside Server Data Models
//!
//! - Call: request/response DTOs for the `/calls` routes
//! - Webhook: provider payload normalisation
//! - Realtime: frames pushed to WebSocket subscribers

mod call;
pub mod realtime;
mod webhook;

pub use call::*;
pub use webhook::*;
