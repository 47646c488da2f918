//! Storage metadata shared by every persisted row.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::canonical_timestamp;
use crate::error::DomainError;
use crate::ids::{ExternalId, RowId};

/// Logical status. Rows are never physically removed; deleting flips this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(DomainError::parse(format!("unknown status: {other}"))),
        }
    }
}

/// Who performed a write, and when (canonical UTC, whole seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub actor: String,
    pub at: DateTime<Utc>,
}

impl Stamp {
    pub fn new(actor: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            at: canonical_timestamp(at),
        }
    }
}

/// Creator/updater identity and timestamps of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    /// A freshly created row: creator and updater are the same stamp.
    pub fn created(stamp: &Stamp) -> Self {
        Self {
            created_by: stamp.actor.clone(),
            updated_by: stamp.actor.clone(),
            created_at: stamp.at,
            updated_at: stamp.at,
        }
    }
}

/// A persisted row: storage keys, status, audit, and kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub key: RowId,
    pub id: ExternalId,
    pub status: RecordStatus,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> Record<T> {
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }
}

/// A persisted line row, tied to its header by the header's surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord<T> {
    pub header_key: RowId,
    #[serde(flatten)]
    pub record: Record<T>,
}
