//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the logging macros,
//! the test capture layer and anything parsing JSON logs downstream.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Comparison subjects
pub const FIELD_ENTITY_TYPE: &str = "entity_type";
pub const FIELD_ATTRIBUTE: &str = "attribute";
pub const FIELD_TEMPLATE_KIND: &str = "template_kind";
pub const FIELD_TEMPLATE_ID: &str = "template_id";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_ENDPOINT: &str = "endpoint";

// Collection sizes
pub const FIELD_ENTITY_COUNT: &str = "entity_count";
pub const FIELD_MISMATCH_COUNT: &str = "mismatch_count";

// Error fields, as emitted by `log_op_error!`
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
