//! Presence checks for required text fields.

use crate::error::DomainError;

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Validate an optional country code is two ASCII letters if present.
pub fn require_country_code(field: &'static str, value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some(code) if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) => Err(
            DomainError::validation(format!("{field} {code:?} is not a two-letter country code")),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_non_empty("name", "Acme").is_ok());
        let err = require_non_empty("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn country_codes() {
        assert!(require_country_code("country_code", None).is_ok());
        assert!(require_country_code("country_code", Some("NL")).is_ok());
        assert!(require_country_code("country_code", Some("NLD")).is_err());
        assert!(require_country_code("country_code", Some("1A")).is_err());
    }
}
