//! Command orchestration layer.
//!
//! Coordinates the core binder, scoper and emitter for one request or one
//! whole document, and owns the lifecycle logging around them.

pub mod document;
pub mod request;
