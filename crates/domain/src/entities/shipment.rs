//! Shipment: a transport header with goods items.

use serde::{Deserialize, Serialize};

use crate::common::{require_non_empty, validate_decimal};
use crate::entities::{
    collect_attachments, Address, Attachment, AttachmentKeys, AttachmentSlot, DocumentKind,
    Linkable, Location, SubResource, Validate,
};
use crate::error::DomainError;
use crate::ids::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewShipment {
    pub shipment_ref: String,
    #[serde(default)]
    pub handling_code: Option<String>,
    #[serde(default)]
    pub gross_weight: Option<String>,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
    #[serde(default)]
    pub origin_address: Option<Address>,
    #[serde(default)]
    pub delivery_address: Option<Address>,
    #[serde(default)]
    pub exit_location: Option<Location>,
}

impl NewShipment {
    pub fn new(shipment_ref: impl Into<String>) -> Self {
        Self {
            shipment_ref: shipment_ref.into(),
            handling_code: None,
            gross_weight: None,
            delivery_instructions: None,
            origin_address: None,
            delivery_address: None,
            exit_location: None,
        }
    }

    pub fn with_origin_address(mut self, address: Address) -> Self {
        self.origin_address = Some(address);
        self
    }

    pub fn with_delivery_address(mut self, address: Address) -> Self {
        self.delivery_address = Some(address);
        self
    }

    pub fn with_exit_location(mut self, location: Location) -> Self {
        self.exit_location = Some(location);
        self
    }
}

impl Validate for NewShipment {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("shipment_ref", &self.shipment_ref)?;
        if let Some(weight) = &self.gross_weight {
            validate_decimal("gross_weight", weight)?;
        }
        self.origin_address.validate()?;
        self.delivery_address.validate()?;
        self.exit_location.validate()
    }
}

impl Linkable for NewShipment {
    type Linked = Shipment;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([
            (
                AttachmentSlot::OriginAddress,
                self.origin_address.clone().map(SubResource::Address),
            ),
            (
                AttachmentSlot::DeliveryAddress,
                self.delivery_address.clone().map(SubResource::Address),
            ),
            (
                AttachmentSlot::ExitLocation,
                self.exit_location.clone().map(SubResource::Location),
            ),
        ])
    }

    fn link(self, keys: &AttachmentKeys) -> Shipment {
        Shipment {
            shipment_ref: self.shipment_ref,
            handling_code: self.handling_code,
            gross_weight: self.gross_weight,
            delivery_instructions: self.delivery_instructions,
            origin_address_key: keys.get(AttachmentSlot::OriginAddress),
            delivery_address_key: keys.get(AttachmentSlot::DeliveryAddress),
            exit_location_key: keys.get(AttachmentSlot::ExitLocation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub shipment_ref: String,
    pub handling_code: Option<String>,
    pub gross_weight: Option<String>,
    pub delivery_instructions: Option<String>,
    pub origin_address_key: Option<RowId>,
    pub delivery_address_key: Option<RowId>,
    pub exit_location_key: Option<RowId>,
}

/// Create payload of a goods item carried by a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGoodsItem {
    pub sequence_number: String,
    pub description: String,
    pub quantity: String,
    #[serde(default)]
    pub declared_value: Option<String>,
    #[serde(default)]
    pub origin_address: Option<Address>,
}

impl NewGoodsItem {
    pub fn new(
        sequence_number: impl Into<String>,
        description: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            sequence_number: sequence_number.into(),
            description: description.into(),
            quantity: quantity.into(),
            declared_value: None,
            origin_address: None,
        }
    }

    pub fn with_origin_address(mut self, address: Address) -> Self {
        self.origin_address = Some(address);
        self
    }
}

impl Validate for NewGoodsItem {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("sequence_number", &self.sequence_number)?;
        validate_decimal("quantity", &self.quantity)?;
        if let Some(value) = &self.declared_value {
            validate_decimal("declared_value", value)?;
        }
        self.origin_address.validate()
    }
}

impl Linkable for NewGoodsItem {
    type Linked = GoodsItem;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([(
            AttachmentSlot::OriginAddress,
            self.origin_address.clone().map(SubResource::Address),
        )])
    }

    fn link(self, keys: &AttachmentKeys) -> GoodsItem {
        GoodsItem {
            sequence_number: self.sequence_number,
            description: self.description,
            quantity: self.quantity,
            declared_value: self.declared_value,
            origin_address_key: keys.get(AttachmentSlot::OriginAddress),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsItem {
    pub sequence_number: String,
    pub description: String,
    pub quantity: String,
    pub declared_value: Option<String>,
    pub origin_address_key: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipmentUpdate {
    #[serde(default)]
    pub handling_code: Option<String>,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
}

impl Validate for ShipmentUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub struct ShipmentKind;

impl DocumentKind for ShipmentKind {
    const NAME: &'static str = "shipment";
    type NewHeader = NewShipment;
    type Header = Shipment;
    type NewLine = NewGoodsItem;
    type Line = GoodsItem;
    type Update = ShipmentUpdate;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachments_follow_declaration_order() {
        let shipment = NewShipment::new("SH-9")
            .with_origin_address(Address::new("Hamburg"))
            .with_exit_location(Location::new("Port of Hamburg"));
        let slots: Vec<_> = shipment.attachments().iter().map(|a| a.slot).collect();
        assert_eq!(
            slots,
            vec![AttachmentSlot::OriginAddress, AttachmentSlot::ExitLocation]
        );
    }

    #[test]
    fn unlinked_slots_stay_empty() {
        let keys = AttachmentKeys::new().with(AttachmentSlot::ExitLocation, RowId::new(2));
        let linked = NewShipment::new("SH-9").link(&keys);
        assert_eq!(linked.exit_location_key, Some(RowId::new(2)));
        assert_eq!(linked.origin_address_key, None);
    }

    #[test]
    fn gross_weight_must_be_decimal() {
        let mut shipment = NewShipment::new("SH-9");
        shipment.gross_weight = Some("heavy".into());
        assert!(shipment.validate().is_err());
    }

    #[test]
    fn goods_item_links_its_own_origin() {
        let item = NewGoodsItem::new("1", "Pallets", "4").with_origin_address(Address::new("Gdansk"));
        let attachments = item.attachments();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].slot, AttachmentSlot::OriginAddress);

        let keys = AttachmentKeys::new().with(AttachmentSlot::OriginAddress, RowId::new(40));
        let linked = item.link(&keys);
        assert_eq!(linked.origin_address_key, Some(RowId::new(40)));
        assert_eq!(linked.description, "Pallets");
    }

    #[test]
    fn misspelled_goods_item_field_is_rejected() {
        let parsed = serde_json::from_value::<NewGoodsItem>(serde_json::json!({
            "sequence_number": "1",
            "description": "Pallets",
            "quantity": "4",
            "origin": {"city_name": "Gdansk"}
        }));
        assert!(parsed.is_err());
    }
}
