//! Canonical logging macros
//!
//! All three emit `component`, `op` and `event`. Extra `key = value` fields
//! are passed through to `tracing` unchanged.

/// Log the start of an operation
///
/// ```
/// # use yangbind_core::log_op_start;
/// log_op_start!("bind");
/// log_op_start!("bind", path = "/acl", opcode = "GET");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use yangbind_core::log_op_end;
/// log_op_end!("bind", duration_ms = 3);
/// log_op_end!("bind", duration_ms = 3, anchor = "/acl/acl-sets");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log an operation error with its canonical kind, code and location
///
/// `$err` is anything convertible into `ExError`. The path and field the
/// error names are logged as `err_path` / `err_field` (empty when absent).
///
/// ```
/// # use yangbind_core::{log_op_error, errors::BindError};
/// let err = BindError::NotFound { path: "/acl".to_string() };
/// log_op_error!("render", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_path = ex_err.path().unwrap_or_default(),
            err_field = ex_err.field().unwrap_or_default(),
            $($($field)*)?
        );
    }};
}
