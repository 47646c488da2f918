//! Despatch advice: notice that goods have been sent, line by line.

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
pub struct NewDespatchAdvice {
    pub despatch_number: String,
    pub issue_date: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Buyer's order number this despatch fulfils.
    #[serde(default)]
    pub order_reference: Option<String>,
    #[serde(default)]
    pub despatch_address: Option<Address>,
}

impl NewDespatchAdvice {
    pub fn new(despatch_number: impl Into<String>, issue_date: impl Into<String>) -> Self {
        Self {
            despatch_number: despatch_number.into(),
            issue_date: issue_date.into(),
            note: None,
            order_reference: None,
            despatch_address: None,
        }
    }

    pub fn with_despatch_address(mut self, address: Address) -> Self {
        self.despatch_address = Some(address);
        self
    }
}

impl Validate for NewDespatchAdvice {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("despatch_number", &self.despatch_number)?;
        parse_document_date("issue_date", &self.issue_date)?;
        self.despatch_address.validate()
    }
}

impl Linkable for NewDespatchAdvice {
    type Linked = DespatchAdvice;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([(
            AttachmentSlot::DespatchAddress,
            self.despatch_address.clone().map(SubResource::Address),
        )])
    }

    fn link(self, keys: &AttachmentKeys) -> DespatchAdvice {
        DespatchAdvice {
            despatch_number: self.despatch_number,
            issue_date: self.issue_date,
            note: self.note,
            order_reference: self.order_reference,
            despatch_address_key: keys.get(AttachmentSlot::DespatchAddress),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DespatchAdvice {
    pub despatch_number: String,
    pub issue_date: String,
    pub note: Option<String>,
    pub order_reference: Option<String>,
    pub despatch_address_key: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DespatchLine {
    pub line_number: String,
    pub item_name: String,
    pub delivered_quantity: String,
    #[serde(default)]
    pub backorder_quantity: Option<String>,
    #[serde(default)]
    pub outstanding_reason: Option<String>,
}

impl DespatchLine {
    pub fn new(
        line_number: impl Into<String>,
        item_name: impl Into<String>,
        delivered_quantity: impl Into<String>,
    ) -> Self {
        Self {
            line_number: line_number.into(),
            item_name: item_name.into(),
            delivered_quantity: delivered_quantity.into(),
            backorder_quantity: None,
            outstanding_reason: None,
        }
    }
}

impl Validate for DespatchLine {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("line_number", &self.line_number)?;
        validate_decimal("delivered_quantity", &self.delivered_quantity)?;
        if let Some(backorder) = &self.backorder_quantity {
            validate_decimal("backorder_quantity", backorder)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DespatchAdviceUpdate {
    #[serde(default)]
    pub note: Option<String>,
}

impl Validate for DespatchAdviceUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub struct DespatchAdviceKind;

impl DocumentKind for DespatchAdviceKind {
    const NAME: &'static str = "despatch_advice";
    type NewHeader = NewDespatchAdvice;
    type Header = DespatchAdvice;
    type NewLine = DespatchLine;
    type Line = DespatchLine;
    type Update = DespatchAdviceUpdate;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backorder_quantity_is_checked_when_present() {
        let mut line = DespatchLine::new("1", "Pallet", "4");
        assert!(line.validate().is_ok());
        line.backorder_quantity = Some("two".into());
        assert!(line.validate().is_err());
    }
}
