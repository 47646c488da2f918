//! Consignment: a header-only document referencing three sub-resources.

use serde::{Deserialize, Serialize};

use crate::common::{require_non_empty, validate_decimal};
use crate::entities::{
    collect_attachments, Address, Attachment, AttachmentKeys, AttachmentSlot, DocumentKind,
    Linkable, Location, SubResource, TaxScheme, Validate,
};
use crate::error::DomainError;
use crate::ids::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewConsignment {
    pub consignment_ref: String,
    #[serde(default)]
    pub carrier_reference: Option<String>,
    #[serde(default)]
    pub summary_description: Option<String>,
    #[serde(default)]
    pub declared_value: Option<String>,
    #[serde(default)]
    pub consignor_address: Option<Address>,
    #[serde(default)]
    pub delivery_location: Option<Location>,
    #[serde(default)]
    pub tax_scheme: Option<TaxScheme>,
}

impl NewConsignment {
    pub fn new(consignment_ref: impl Into<String>) -> Self {
        Self {
            consignment_ref: consignment_ref.into(),
            carrier_reference: None,
            summary_description: None,
            declared_value: None,
            consignor_address: None,
            delivery_location: None,
            tax_scheme: None,
        }
    }

    pub fn with_consignor_address(mut self, address: Address) -> Self {
        self.consignor_address = Some(address);
        self
    }

    pub fn with_delivery_location(mut self, location: Location) -> Self {
        self.delivery_location = Some(location);
        self
    }

    pub fn with_tax_scheme(mut self, scheme: TaxScheme) -> Self {
        self.tax_scheme = Some(scheme);
        self
    }
}

impl Validate for NewConsignment {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("consignment_ref", &self.consignment_ref)?;
        if let Some(value) = &self.declared_value {
            validate_decimal("declared_value", value)?;
        }
        self.consignor_address.validate()?;
        self.delivery_location.validate()?;
        self.tax_scheme.validate()
    }
}

impl Linkable for NewConsignment {
    type Linked = Consignment;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([
            (
                AttachmentSlot::ConsignorAddress,
                self.consignor_address.clone().map(SubResource::Address),
            ),
            (
                AttachmentSlot::DeliveryLocation,
                self.delivery_location.clone().map(SubResource::Location),
            ),
            (
                AttachmentSlot::TaxScheme,
                self.tax_scheme.clone().map(SubResource::TaxScheme),
            ),
        ])
    }

    fn link(self, keys: &AttachmentKeys) -> Consignment {
        Consignment {
            consignment_ref: self.consignment_ref,
            carrier_reference: self.carrier_reference,
            summary_description: self.summary_description,
            declared_value: self.declared_value,
            consignor_address_key: keys.get(AttachmentSlot::ConsignorAddress),
            delivery_location_key: keys.get(AttachmentSlot::DeliveryLocation),
            tax_scheme_key: keys.get(AttachmentSlot::TaxScheme),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consignment {
    pub consignment_ref: String,
    pub carrier_reference: Option<String>,
    pub summary_description: Option<String>,
    pub declared_value: Option<String>,
    pub consignor_address_key: Option<RowId>,
    pub delivery_location_key: Option<RowId>,
    pub tax_scheme_key: Option<RowId>,
}

/// Consignments carry no lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoLines {}

impl Validate for NoLines {
    fn validate(&self) -> Result<(), DomainError> {
        match *self {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsignmentUpdate {
    #[serde(default)]
    pub carrier_reference: Option<String>,
    #[serde(default)]
    pub summary_description: Option<String>,
}

impl Validate for ConsignmentUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub struct ConsignmentKind;

impl DocumentKind for ConsignmentKind {
    const NAME: &'static str = "consignment";
    type NewHeader = NewConsignment;
    type Header = Consignment;
    type NewLine = NoLines;
    type Line = NoLines;
    type Update = ConsignmentUpdate;
}
