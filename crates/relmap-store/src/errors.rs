//! Error handling for relmap-store
//!
//! Wraps relmap-core ExError with store-specific helpers

use relmap_core::errors::{ExError, ExErrorKind, RelMapError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a table-creation error
pub fn ddl_error(table: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("create_all")
        .with_message(format!("Creating table {} failed: {}", table, reason))
}

/// Create a checksum mismatch error for a table whose DDL changed
pub fn checksum_mismatch(table: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ChecksumMismatch)
        .with_op("create_all")
        .with_message(format!(
            "Table {} was created from different DDL: recorded {}, declared {}",
            table, expected, actual
        ))
}

/// Create an error for an unusable database URL
pub fn invalid_url(url: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("parse_database_url")
        .with_message(format!("Invalid database URL '{}': {}", url, reason))
}

/// Create a database error from rusqlite::Error
///
/// Constraint failures (foreign key, unique) map to `ConstraintViolation`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ExErrorKind::ConstraintViolation
        }
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Lift a domain error into the store's error type
pub fn from_domain(op: &str, err: RelMapError) -> ExError {
    ExError::from(err).with_op(op)
}
