//! Error handling for upcheck-store
//!
//! Wraps upcheck-core ExError with store-specific helpers

use upcheck_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a missing-artifact error
pub fn not_found(operation: &str, key: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(operation.to_string())
        .with_entity_id(key.to_string())
        .with_message(format!("{} not found", key))
}

/// Create a write-once violation error
pub fn already_exists(operation: &str, key: &str) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op(operation.to_string())
        .with_entity_id(key.to_string())
        .with_message(format!(
            "{} is already persisted with different content",
            key
        ))
}

/// Create an invalid key error
pub fn invalid_key(operation: &str, key: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_entity_id(key.to_string())
        .with_message(reason.to_string())
}

/// Create a serialization error
pub fn serialization(operation: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a config validation error
pub fn config_invalid(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("config_parse")
        .with_message(reason.to_string())
}

/// Create an IO error, mapping a missing file to `NotFound`
pub fn io_error(operation: &str, key: &str, err: std::io::Error) -> ExError {
    if err.kind() == std::io::ErrorKind::NotFound {
        return not_found(operation, key);
    }
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_entity_id(key.to_string())
        .with_message(err.to_string())
}
