//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod call_status;
mod phone_number;

pub use call_status::*;
pub use phone_number::*;
