//! Geographic location sub-resource (ports, delivery points).

use serde::{Deserialize, Serialize};

use crate::common::{require_non_empty, validate_decimal};
use crate::entities::Validate;
use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub description: String,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub country_subentity: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

impl Location {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        self.latitude = Some(latitude.into());
        self.longitude = Some(longitude.into());
        self
    }
}

impl Validate for Location {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("location.description", &self.description)?;
        if let Some(latitude) = &self.latitude {
            validate_decimal("location.latitude", latitude)?;
        }
        if let Some(longitude) = &self.longitude {
            validate_decimal("location.longitude", longitude)?;
        }
        Ok(())
    }
}
