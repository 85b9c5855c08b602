//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - CallRecord: Authoritative state of a placed call
//! - TranscriptSegment: One utterance of a call transcript
//! - Persona: Assistant identity used when placing the call
//! - StatusUpdate / CallEvent: Inbound updates and outbound notifications

mod call;
mod event;
mod persona;

pub use call::*;
pub use event::*;
pub use persona::*;
