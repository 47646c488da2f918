//! Format checks for decimal quantities and amounts.
//!
//! Values travel and are stored as text so no precision is lost; this only
//! rejects text that does not parse as a decimal number.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::DomainError;

pub fn validate_decimal(field: &'static str, value: &str) -> Result<(), DomainError> {
    Decimal::from_str(value)
        .map(|_| ())
        .map_err(|e| DomainError::validation(format!("{field} {value:?} is not a decimal: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_decimals_pass() {
        for ok in ["0", "12", "12.5", "-3.25", "0007.10", "79228162514264337593543950335"] {
            assert!(validate_decimal("quantity", ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn malformed_numbers_fail() {
        for bad in ["", "abc", "NaN", "inf", "1,5", "1.2.3", "12kg"] {
            assert!(validate_decimal("quantity", bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn error_names_the_field() {
        let err = validate_decimal("declared_value", "ten").expect_err("invalid");
        assert!(err.to_string().contains("declared_value"));
    }
}
