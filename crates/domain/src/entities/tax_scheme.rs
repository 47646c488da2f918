//! Tax scheme: attached to parties and consignments, and also managed on its own.

use serde::{Deserialize, Serialize};

use crate::common::require_non_empty;
use crate::entities::Validate;
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxScheme {
    /// Scheme code, e.g. `VAT`.
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_type_code: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl TaxScheme {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Validate for TaxScheme {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("tax_scheme.code", &self.code)
    }
}

/// Narrow update of a standalone tax scheme; the code is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxSchemeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_type_code: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl Validate for TaxSchemeUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
