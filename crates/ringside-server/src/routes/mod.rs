//! Ringside API Routes
//!
//! - /calls - Place, list and inspect calls (API key protected)
//! - /calls/:id/refresh - Out-of-band provider status check
//! - /calls/:id/persona - Mid-call persona update
//! - /webhook - Provider events and function calls
//! - /ws - Realtime call updates

pub mod call;
pub mod error;
pub mod realtime;
pub mod swagger;
pub mod webhook;
