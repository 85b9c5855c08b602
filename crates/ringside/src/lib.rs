//! Ringside Domain Library
//!
//! Core domain types and interfaces for placing outbound AI voice calls
//! and keeping an authoritative, realtime view of each call session.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (CallRecord, TranscriptSegment, Persona, CallEvent)
//!   - `value_objects/`: Immutable value types (CallStatus, ProviderStatus, PhoneNumber)
//!   - `services/`: Status reconciliation and transcript appending rules
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Call record storage
//!   - `services/`: Voice provider collaborators (assistant, dialer, status)
//!   - `events`: Fan-out of state changes to realtime subscribers
//!
//! # Usage
//!
//! ```rust,ignore
//! use ringside::domain::{CallRecord, StatusUpdate, reconcile_status};
//! use ringside::ports::{CallRepository, EventPublisher};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    append_transcript, reconcile_status, CallEvent, CallRecord, CallStatus, DomainError,
    EventOrigin, Persona, PhoneNumber, ProviderError, ProviderStatus, Reconciliation,
    StatusUpdate, TranscriptOutcome, TranscriptSegment, UNKNOWN_ENDED_REASON,
};
pub use ports::{
    // Provider collaborators
    AssistantConfigurator,
    // Repositories
    CallRepository,
    CallStatusSource,
    Dialer,
    // Events
    EventPublisher,
    PlacedCall,
    ProviderCallStatus,
};
