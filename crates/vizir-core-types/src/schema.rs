//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Entity identifiers
pub const FIELD_SUITE: &str = "suite";
pub const FIELD_STATE: &str = "state";
pub const FIELD_BROWSER_ID: &str = "browser_id";
pub const FIELD_SESSION_ID: &str = "session_id";

// Pipeline fields
pub const FIELD_REF_PATH: &str = "reference_path";
pub const FIELD_CURRENT_PATH: &str = "current_path";
pub const FIELD_TOLERANCE: &str = "tolerance";
pub const FIELD_EQUAL: &str = "equal";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        // Verify all constants are non-empty
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_SUITE.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }
}
