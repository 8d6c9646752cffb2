//! Unified error handling for daybook-core

use thiserror::Error;

/// Core error type for daybook-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid record field `{field}`: {reason}")]
    InvalidRecord { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for daybook-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an error naming the offending record field
    pub fn invalid_record(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("month must be 1-12");
        assert_eq!(err.to_string(), "Validation error: month must be 1-12");
    }

    #[test]
    fn test_invalid_record_names_field() {
        let err = Error::invalid_record("spend_date", "expected YYYY-MM-DD");
        assert_eq!(
            err.to_string(),
            "Invalid record field `spend_date`: expected YYYY-MM-DD"
        );
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = Error::not_found("user u-1");
        let s: String = err.into();
        assert!(s.contains("Not found"));
    }
}
