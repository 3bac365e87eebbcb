//! yangbind engine - request orchestration layer
//!
//! Sits between transports (the CLI, a RESTCONF or gNMI front end) and the
//! core binder. The engine owns the process-wide schema registry, TOML
//! configuration, and request processing with boundary logging.

pub mod commands;
pub mod config;
pub mod registry;

pub use commands::document::{dump_document, load_document};
pub use commands::request::{process, process_with_codec, Request, Response};
pub use config::{ConfigError, EngineConfig};
