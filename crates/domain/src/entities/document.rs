//! The composite document shape shared by every document kind.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entities::{LineRecord, Linkable, Record};
use crate::error::DomainError;

/// Format-level validation run before any storage access.
pub trait Validate {
    fn validate(&self) -> Result<(), DomainError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), DomainError> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}

/// Ties together the payload types of one document kind.
pub trait DocumentKind: Send + Sync + 'static {
    /// Used in logs, errors and routes.
    const NAME: &'static str;

    /// Create payload of the header, attachments included.
    type NewHeader: Linkable<Linked = Self::Header>
        + Validate
        + Clone
        + Debug
        + Send
        + Sync
        + Serialize
        + DeserializeOwned;
    /// Stored header fields, attachments reduced to keys.
    type Header: Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned;
    /// Create payload of one line, attachments included.
    type NewLine: Linkable<Linked = Self::Line>
        + Validate
        + Clone
        + Debug
        + Send
        + Sync
        + Serialize
        + DeserializeOwned;
    type Line: Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned;
    /// The narrow set of header fields callers may change.
    type Update: Validate + Clone + Debug + Send + Sync + Serialize + DeserializeOwned;
}

/// Create payload: a header and the lines it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDocument<H, L> {
    pub header: H,
    #[serde(default = "Vec::new")]
    pub lines: Vec<L>,
}

impl<H: Validate, L: Validate> NewDocument<H, L> {
    pub fn new(header: H, lines: Vec<L>) -> Self {
        Self { header, lines }
    }

    pub fn validate_all(&self) -> Result<(), DomainError> {
        self.header.validate()?;
        for (index, line) in self.lines.iter().enumerate() {
            line.validate().map_err(|e| match e {
                DomainError::Validation(msg) => {
                    DomainError::validation(format!("line {}: {msg}", index + 1))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// A committed header with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<H, L> {
    pub header: Record<H>,
    pub lines: Vec<LineRecord<L>>,
}

pub type NewDocumentOf<K> =
    NewDocument<<K as DocumentKind>::NewHeader, <K as DocumentKind>::NewLine>;
pub type DocumentOf<K> = Document<<K as DocumentKind>::Header, <K as DocumentKind>::Line>;
