//! Server-side services outside the call lifecycle

pub mod functions;

pub use functions::FunctionCallHandler;
