//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the call store, the voice provider and realtime subscribers.

mod call_service;
mod poller;
mod session_service;

pub use call_service::{CallOrchestrator, RefreshOutcome};
pub use poller::{FallbackPoller, DEFAULT_POLL_DELAY};
pub use session_service::CallSessionService;
