//! Organizational party: a node in a forest of organizations.
//!
//! `level` is 0 for roots and `parent.level + 1` otherwise. `leaf` reads
//! "has been given at least one child": roots and fresh children start with
//! `leaf = false`, and a parent flips to `true` when it gains its first child.

use serde::{Deserialize, Serialize};

use crate::common::require_non_empty;
use crate::entities::{
    collect_attachments, Address, Attachment, AttachmentKeys, AttachmentSlot, Linkable, Record,
    SubResource, TaxScheme, Validate,
};
use crate::error::DomainError;
use crate::ids::RowId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewParty {
    pub name: String,
    #[serde(default)]
    pub registration_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub endpoint_id: Option<String>,
    #[serde(default)]
    pub industry_classification: Option<String>,
    #[serde(default)]
    pub postal_address: Option<Address>,
    #[serde(default)]
    pub party_tax_scheme: Option<TaxScheme>,
}

impl NewParty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registration_name: None,
            company_id: None,
            endpoint_id: None,
            industry_classification: None,
            postal_address: None,
            party_tax_scheme: None,
        }
    }

    pub fn with_postal_address(mut self, address: Address) -> Self {
        self.postal_address = Some(address);
        self
    }

    pub fn with_tax_scheme(mut self, scheme: TaxScheme) -> Self {
        self.party_tax_scheme = Some(scheme);
        self
    }
}

impl Validate for NewParty {
    fn validate(&self) -> Result<(), DomainError> {
        require_non_empty("name", &self.name)?;
        self.postal_address.validate()?;
        self.party_tax_scheme.validate()
    }
}

impl Linkable for NewParty {
    type Linked = PartyDetails;

    fn attachments(&self) -> Vec<Attachment> {
        collect_attachments([
            (
                AttachmentSlot::PostalAddress,
                self.postal_address.clone().map(SubResource::Address),
            ),
            (
                AttachmentSlot::PartyTaxScheme,
                self.party_tax_scheme.clone().map(SubResource::TaxScheme),
            ),
        ])
    }

    fn link(self, keys: &AttachmentKeys) -> PartyDetails {
        PartyDetails {
            name: self.name,
            registration_name: self.registration_name,
            company_id: self.company_id,
            endpoint_id: self.endpoint_id,
            industry_classification: self.industry_classification,
            postal_address_key: keys.get(AttachmentSlot::PostalAddress),
            party_tax_scheme_key: keys.get(AttachmentSlot::PartyTaxScheme),
        }
    }
}

/// Descriptive party fields, attachments reduced to keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDetails {
    pub name: String,
    pub registration_name: Option<String>,
    pub company_id: Option<String>,
    pub endpoint_id: Option<String>,
    pub industry_classification: Option<String>,
    pub postal_address_key: Option<RowId>,
    pub party_tax_scheme_key: Option<RowId>,
}

/// Position of a node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePosition {
    /// [`RowId::NONE`] for roots.
    pub parent_key: RowId,
    pub level: i64,
    pub child_count: i64,
    pub leaf: bool,
}

impl TreePosition {
    pub const fn root() -> Self {
        Self {
            parent_key: RowId::NONE,
            level: 0,
            child_count: 0,
            leaf: false,
        }
    }

    /// Position of a new child under a parent at `parent_level`.
    pub const fn child_of(parent_key: RowId, parent_level: i64) -> Self {
        Self {
            parent_key,
            level: parent_level + 1,
            child_count: 0,
            leaf: false,
        }
    }

    pub const fn is_root(&self) -> bool {
        self.parent_key.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyNode {
    #[serde(flatten)]
    pub details: PartyDetails,
    #[serde(flatten)]
    pub position: TreePosition,
}

pub type Party = Record<PartyNode>;

/// Parent state observed by a child creation, after its increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentUpdate {
    pub parent_key: RowId,
    pub level: i64,
    pub child_count: i64,
}

/// A child party plus the parent counters its creation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedChild {
    pub child: Party,
    pub parent: ParentUpdate,
    pub relationship_key: RowId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registration_name: Option<String>,
    #[serde(default)]
    pub endpoint_id: Option<String>,
}

impl Validate for PartyUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_starts_without_leaf_flag() {
        let root = TreePosition::root();
        assert!(root.is_root());
        assert_eq!(root.level, 0);
        assert!(!root.leaf);
    }

    #[test]
    fn child_sits_one_level_below_parent() {
        let child = TreePosition::child_of(RowId::new(5), 2);
        assert_eq!(child.level, 3);
        assert_eq!(child.parent_key, RowId::new(5));
        assert!(!child.is_root());
        assert_eq!(child.child_count, 0);
    }

    #[test]
    fn blank_rename_is_rejected() {
        let update = PartyUpdate {
            name: Some(" ".into()),
            ..PartyUpdate::default()
        };
        assert!(update.validate().is_err());
        assert!(PartyUpdate::default().validate().is_ok());
    }

    #[test]
    fn link_binds_both_slots() {
        let keys = AttachmentKeys::new()
            .with(AttachmentSlot::PostalAddress, RowId::new(1))
            .with(AttachmentSlot::PartyTaxScheme, RowId::new(2));
        let details = NewParty::new("Acme")
            .with_postal_address(Address::new("Utrecht"))
            .with_tax_scheme(TaxScheme::new("VAT"))
            .link(&keys);
        assert_eq!(details.postal_address_key, Some(RowId::new(1)));
        assert_eq!(details.party_tax_scheme_key, Some(RowId::new(2)));
    }
}
