//! Receipt advice: the receiver's account of what actually arrived.

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
pub struct NewReceiptAdvice {
    pub receipt_number: String,
    pub issue_date: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Despatch number of the advice being acknowledged.
    #[serde(default)]
    pub despatch_reference: Option<String>,
    #[serde(default)]
    pub receipt_address: Option<Address>,
}

impl NewReceiptAdvice {
    pub fn new(receipt_number: impl Into<String>, issue_date: impl Into<String>) -> Self {
        Self {
            receipt_number: receipt_number.into(),
            issue_date: issue_date.into(),
            note: None,
            despatch_reference: None,
            receipt_address: None,
        }
    }
}

impl Validate for NewReceiptAdvice {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("receipt_number", &self.receipt_number)?;
        parse_document_date("issue_date", &self.issue_date)?;
        self.receipt_address.validate()
    }
}

impl Linkable for NewReceiptAdvice {
    type Linked = ReceiptAdvice;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([(
            AttachmentSlot::ReceiptAddress,
            self.receipt_address.clone().map(SubResource::Address),
        )])
    }

    fn link(self, keys: &AttachmentKeys) -> ReceiptAdvice {
        ReceiptAdvice {
            receipt_number: self.receipt_number,
            issue_date: self.issue_date,
            note: self.note,
            despatch_reference: self.despatch_reference,
            receipt_address_key: keys.get(AttachmentSlot::ReceiptAddress),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptAdvice {
    pub receipt_number: String,
    pub issue_date: String,
    pub note: Option<String>,
    pub despatch_reference: Option<String>,
    pub receipt_address_key: Option<RowId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiptLine {
    pub line_number: String,
    pub item_name: String,
    pub received_quantity: String,
    #[serde(default)]
    pub short_quantity: Option<String>,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

impl ReceiptLine {
    pub fn new(
        line_number: impl Into<String>,
        item_name: impl Into<String>,
        received_quantity: impl Into<String>,
    ) -> Self {
        Self {
            line_number: line_number.into(),
            item_name: item_name.into(),
            received_quantity: received_quantity.into(),
            short_quantity: None,
            reject_reason: None,
        }
    }
}

impl Validate for ReceiptLine {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("line_number", &self.line_number)?;
        validate_decimal("received_quantity", &self.received_quantity)?;
        if let Some(short) = &self.short_quantity {
            validate_decimal("short_quantity", short)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiptAdviceUpdate {
    #[serde(default)]
    pub note: Option<String>,
}

impl Validate for ReceiptAdviceUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub struct ReceiptAdviceKind;

impl DocumentKind for ReceiptAdviceKind {
    const NAME: &'static str = "receipt_advice";
    type NewHeader = NewReceiptAdvice;
    type Header = ReceiptAdvice;
    type NewLine = ReceiptLine;
    type Line = ReceiptLine;
    type Update = ReceiptAdviceUpdate;
}
