//! Event Publishing Port
//!
//! Fan-out of accepted state changes to realtime subscribers.
//! Delivery is fire-and-forget: no acknowledgment, no replay.

use crate::domain::CallEvent;

/// Publishes canonical call events
pub trait EventPublisher: Send + Sync {
    /// Publish an event to every currently connected subscriber.
    /// Must not block and must not fail the caller.
    fn publish(&self, event: CallEvent);
}
