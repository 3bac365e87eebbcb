//! Canonical field keys and event names for structured logging
//!
//! Shared by the logging macros, the test capture layer and the error facility
//! so that every boundary event has the same shape.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Request identifiers
pub const FIELD_PATH: &str = "path";
pub const FIELD_OPCODE: &str = "opcode";
pub const FIELD_PAYLOAD_LEN: &str = "payload_len";
pub const FIELD_ANCHOR: &str = "anchor";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
/// Path the failure was detected at; may be deeper than the request path
pub const FIELD_ERR_PATH: &str = "err_path";
/// Offending field, key or segment name
pub const FIELD_ERR_FIELD: &str = "err_field";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_request_fields_do_not_collide() {
        let fields = [FIELD_PATH, FIELD_OPCODE, FIELD_PAYLOAD_LEN, FIELD_ANCHOR];
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
