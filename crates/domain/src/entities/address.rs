//! Postal address sub-resource.

use serde::{Deserialize, Serialize};

use crate::common::require_country_code;
use crate::entities::Validate;
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub additional_street_name: Option<String>,
    #[serde(default)]
    pub building_number: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub postal_zone: Option<String>,
    #[serde(default)]
    pub country_subentity: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Address {
    pub fn new(city_name: impl Into<String>) -> Self {
        Self {
            city_name: Some(city_name.into()),
            ..Self::default()
        }
    }

    pub fn with_street(mut self, street_name: impl Into<String>) -> Self {
        self.street_name = Some(street_name.into());
        self
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }
}

impl Validate for Address {
    fn validate(&self) -> Result<(), DomainError> {
        require_country_code("address.country_code", self.country_code.as_deref())
    }
}
