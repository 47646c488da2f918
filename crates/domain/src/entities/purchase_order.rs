//! Purchase order: an order header with priced order lines.

use serde::{Deserialize, Serialize};

use crate::common::{parse_document_date, require_non_empty, validate_decimal};
use crate::entities::{
    collect_attachments, Address, Attachment, AttachmentKeys, AttachmentSlot, DocumentKind,
    Linkable, SubResource, Validate,
};
use crate::error::DomainError;
use crate::ids::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPurchaseOrder {
    pub order_number: String,
    /// `YYYY-MM-DD`
    pub issue_date: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub buyer_party_key: Option<RowId>,
    #[serde(default)]
    pub seller_party_key: Option<RowId>,
    #[serde(default)]
    pub delivery_address: Option<Address>,
}

impl NewPurchaseOrder {
    pub fn new(order_number: impl Into<String>, issue_date: impl Into<String>) -> Self {
        Self {
            order_number: order_number.into(),
            issue_date: issue_date.into(),
            note: None,
            currency_code: None,
            buyer_party_key: None,
            seller_party_key: None,
            delivery_address: None,
        }
    }

    pub fn with_delivery_address(mut self, address: Address) -> Self {
        self.delivery_address = Some(address);
        self
    }
}

impl Validate for NewPurchaseOrder {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("order_number", &self.order_number)?;
        parse_document_date("issue_date", &self.issue_date)?;
        self.delivery_address.validate()
    }
}

impl Linkable for NewPurchaseOrder {
    type Linked = PurchaseOrder;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([(
            AttachmentSlot::DeliveryAddress,
            self.delivery_address.clone().map(SubResource::Address),
        )])
    }

    fn link(self, keys: &AttachmentKeys) -> PurchaseOrder {
        PurchaseOrder {
            order_number: self.order_number,
            issue_date: self.issue_date,
            note: self.note,
            currency_code: self.currency_code,
            buyer_party_key: self.buyer_party_key,
            seller_party_key: self.seller_party_key,
            delivery_address_key: keys.get(AttachmentSlot::DeliveryAddress),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub order_number: String,
    pub issue_date: String,
    pub note: Option<String>,
    pub currency_code: Option<String>,
    pub buyer_party_key: Option<RowId>,
    pub seller_party_key: Option<RowId>,
    pub delivery_address_key: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurchaseOrderLine {
    pub line_number: String,
    pub item_name: String,
    pub quantity: String,
    #[serde(default)]
    pub unit_code: Option<String>,
    #[serde(default)]
    pub price_amount: Option<String>,
}

impl PurchaseOrderLine {
    pub fn new(
        line_number: impl Into<String>,
        item_name: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            line_number: line_number.into(),
            item_name: item_name.into(),
            quantity: quantity.into(),
            unit_code: None,
            price_amount: None,
        }
    }
}

impl Validate for PurchaseOrderLine {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("line_number", &self.line_number)?;
        validate_decimal("quantity", &self.quantity)?;
        if let Some(price) = &self.price_amount {
            validate_decimal("price_amount", price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurchaseOrderUpdate {
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl Validate for PurchaseOrderUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub struct PurchaseOrderKind;

impl DocumentKind for PurchaseOrderKind {
    const NAME: &'static str = "purchase_order";
    type NewHeader = NewPurchaseOrder;
    type Header = PurchaseOrder;
    type NewLine = PurchaseOrderLine;
    type Line = PurchaseOrderLine;
    type Update = PurchaseOrderUpdate;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewDocument;

    #[test]
    fn link_carries_generated_address_key() {
        let order = NewPurchaseOrder::new("PO-1", "2024-04-01")
            .with_delivery_address(Address::new("Rotterdam"));
        assert_eq!(order.attachments().len(), 1);

        let keys = AttachmentKeys::new().with(AttachmentSlot::DeliveryAddress, RowId::new(12));
        let linked = order.link(&keys);
        assert_eq!(linked.delivery_address_key, Some(RowId::new(12)));
        assert_eq!(linked.order_number, "PO-1");
    }

    #[test]
    fn misspelled_address_field_does_not_deserialize() {
        let parsed = serde_json::from_value::<NewPurchaseOrder>(serde_json::json!({
            "order_number": "PO-1",
            "issue_date": "2024-04-01",
            "delivery_address": { "city": "Utrecht" }
        }));
        assert!(parsed.is_err());

        let parsed = serde_json::from_value::<NewPurchaseOrder>(serde_json::json!({
            "order_number": "PO-1",
            "issue_date": "2024-04-01",
            "delivery_address": { "city_name": "Utrecht" }
        }))
        .expect("deserialize");
        assert_eq!(
            parsed.delivery_address.and_then(|a| a.city_name).as_deref(),
            Some("Utrecht")
        );
    }

    #[test]
    fn malformed_issue_date_fails_validation() {
        let order = NewPurchaseOrder::new("PO-1", "01-04-2024");
        assert!(matches!(order.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn bad_line_quantity_names_the_line() {
        let doc = NewDocument::new(
            NewPurchaseOrder::new("PO-1", "2024-04-01"),
            vec![
                PurchaseOrderLine::new("1", "Bolts", "10"),
                PurchaseOrderLine::new("2", "Nuts", "a dozen"),
            ],
        );
        let err = doc.validate_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
