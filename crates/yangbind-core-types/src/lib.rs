//! Core types shared across yangbind crates
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: canonical field keys and event names used by logging

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
