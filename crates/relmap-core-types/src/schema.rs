//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_SESSION_ID: &str = "session_id";

// Entity identifiers
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_PARENT_ID: &str = "parent_id";
pub const FIELD_CHILD_ID: &str = "child_id";

// SQL echo
pub const FIELD_SQL: &str = "sql";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_LINK: &str = "link";
pub const EVENT_UNLINK: &str = "unlink";
pub const EVENT_ECHO: &str = "echo";
