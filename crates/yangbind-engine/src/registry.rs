//! Process-wide schema registry
//!
//! The built-in schema is registered once, on first use, and shared
//! read-only afterwards. Concurrent first callers block until the single
//! registration finishes and all observe the same result, failure included.
//! Touch the registry during startup and abort if it reports an error.

#![allow(clippy::result_large_err)]

use std::sync::{Arc, OnceLock};

use tracing::info;
use yangbind_core::models::builtin_schema;
use yangbind_core::{DataTree, ExError, Schema};

static SCHEMA: OnceLock<Result<Arc<Schema>, ExError>> = OnceLock::new();

/// The registered schema
///
/// # Errors
///
/// Returns the registration error (`InternalSchema`) if the built-in models
/// are inconsistent. The error is sticky for the life of the process.
pub fn schema() -> Result<Arc<Schema>, ExError> {
    SCHEMA
        .get_or_init(|| {
            let registered = builtin_schema()
                .map(Arc::new)
                .map_err(|e| ExError::from(e).with_op("schema_register"));
            if let Ok(schema) = &registered {
                info!(modules = ?schema.modules(), "registered schema");
            }
            registered
        })
        .clone()
}

/// An empty data tree over the registered schema
///
/// # Errors
///
/// See [`schema`].
pub fn new_tree() -> Result<DataTree, ExError> {
    Ok(DataTree::new(schema()?))
}
