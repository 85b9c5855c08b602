//! Domain Services
//!
//! Stateless rules operating on domain entities.

mod reconciler;

pub use reconciler::*;
