//! Sub-resources attached to headers, and the keys they receive on insert.
//!
//! A header payload names its attachments by slot. The writer inserts each
//! one and records the generated key under the same slot; the header is then
//! linked against those keys with a pure function, so key propagation never
//! depends on mutating a shared payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Address, Location, TaxScheme, Validate};
use crate::error::DomainError;
use crate::ids::RowId;

/// Foreign-key column a sub-resource key is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSlot {
    DeliveryAddress,
    OriginAddress,
    ExitLocation,
    DespatchAddress,
    ReceiptAddress,
    ConsignorAddress,
    DeliveryLocation,
    TaxScheme,
    PostalAddress,
    PartyTaxScheme,
}

impl AttachmentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeliveryAddress => "delivery_address",
            Self::OriginAddress => "origin_address",
            Self::ExitLocation => "exit_location",
            Self::DespatchAddress => "despatch_address",
            Self::ReceiptAddress => "receipt_address",
            Self::ConsignorAddress => "consignor_address",
            Self::DeliveryLocation => "delivery_location",
            Self::TaxScheme => "tax_scheme",
            Self::PostalAddress => "postal_address",
            Self::PartyTaxScheme => "party_tax_scheme",
        }
    }
}

/// Payload of an attached entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubResource {
    Address(Address),
    Location(Location),
    TaxScheme(TaxScheme),
}

impl SubResource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Location(_) => "location",
            Self::TaxScheme(_) => "tax_scheme",
        }
    }
}

impl Validate for SubResource {
    fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Address(address) => address.validate(),
            Self::Location(location) => location.validate(),
            Self::TaxScheme(scheme) => scheme.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub slot: AttachmentSlot,
    pub resource: SubResource,
}

impl Attachment {
    pub fn new(slot: AttachmentSlot, resource: SubResource) -> Self {
        Self { slot, resource }
    }
}

/// Keys generated for a header's attachments, by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentKeys(BTreeMap<AttachmentSlot, RowId>);

impl AttachmentKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `slot` bound to `key`.
    pub fn with(mut self, slot: AttachmentSlot, key: RowId) -> Self {
        self.0.insert(slot, key);
        self
    }

    pub fn get(&self, slot: AttachmentSlot) -> Option<RowId> {
        self.0.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttachmentSlot, RowId)> + '_ {
        self.0.iter().map(|(slot, key)| (*slot, *key))
    }
}

/// A payload whose attachments must be stored before it is.
pub trait Linkable {
    /// The payload with attachment payloads replaced by their keys.
    type Linked;

    /// Attachments in insertion order.
    fn attachments(&self) -> Vec<Attachment>;

    fn link(self, keys: &AttachmentKeys) -> Self::Linked;
}

/// Collects `Some` payloads into attachments, skipping absent slots.
pub fn collect_attachments<const N: usize>(
    slots: [(AttachmentSlot, Option<SubResource>); N],
) -> Vec<Attachment> {
    slots
        .into_iter()
        .filter_map(|(slot, resource)| resource.map(|resource| Attachment::new(slot, resource)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_looked_up_by_slot() {
        let keys = AttachmentKeys::new()
            .with(AttachmentSlot::OriginAddress, RowId::new(3))
            .with(AttachmentSlot::ExitLocation, RowId::new(9));

        assert_eq!(keys.get(AttachmentSlot::OriginAddress), Some(RowId::new(3)));
        assert_eq!(keys.get(AttachmentSlot::ExitLocation), Some(RowId::new(9)));
        assert_eq!(keys.get(AttachmentSlot::DeliveryAddress), None);
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn absent_payloads_produce_no_attachment() {
        let attachments = collect_attachments([
            (AttachmentSlot::DeliveryAddress, None),
            (
                AttachmentSlot::TaxScheme,
                Some(SubResource::TaxScheme(TaxScheme::new("VAT"))),
            ),
        ]);
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].slot, AttachmentSlot::TaxScheme);
        assert_eq!(attachments[0].resource.kind(), "tax_scheme");
    }

    #[test]
    fn sub_resource_validation_delegates() {
        let bad = SubResource::Location(Location::new("Quay 4").with_coordinates("north", "4.1"));
        assert!(bad.validate().is_err());
    }
}
