//! Unified error types for the domain layer
//!
//! Everything here is detected before storage is touched: malformed dates,
//! numbers, identifiers and cursors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for a malformed field.
    ///
    /// # Example
    /// ```ignore
    /// if number.trim().is_empty() {
    ///     return Err(DomainError::validation("order number cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("issue date is malformed");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: issue date is malformed");
    }

    #[test]
    fn test_invalid_id_error() {
        let err = DomainError::invalid_id("abc");
        assert_eq!(err.to_string(), "Invalid ID format: abc");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("unknown status: archived");
        assert!(matches!(err, DomainError::Parse(_)));
        assert!(err.to_string().contains("archived"));
    }
}
