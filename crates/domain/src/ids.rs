use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::DomainError;

/// Width of the binary storage form of an [`ExternalId`].
pub const EXTERNAL_ID_LEN: usize = 16;

/// Caller-visible identifier of a stored row.
///
/// Minted once at creation, independent of the storage-assigned [`RowId`],
/// and never reassigned. Stored as 16 raw bytes; rendered to callers as
/// lowercase hyphenated text and accepted back in that same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalId(Uuid);

impl ExternalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Binary storage form.
    pub fn to_bytes(self) -> [u8; EXTERNAL_ID_LEN] {
        *self.0.as_bytes()
    }

    /// Rebuild from the binary storage form. Anything other than exactly
    /// sixteen bytes is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        Uuid::from_slice(bytes).map(Self).map_err(|_| {
            DomainError::invalid_id(format!(
                "expected {EXTERNAL_ID_LEN} bytes, got {}",
                bytes.len()
            ))
        })
    }

    /// Parse the canonical text form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("{value}: {e}")))
    }
}

impl Default for ExternalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ExternalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ExternalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Serialize for ExternalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExternalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Storage-assigned surrogate key.
///
/// Monotonically increasing, used for internal joins and default ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(i64);

impl RowId {
    /// Parent sentinel for party nodes that have no parent.
    pub const NONE: RowId = RowId(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RowId> for i64 {
    fn from(value: RowId) -> Self {
        value.0
    }
}

impl FromStr for RowId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::parse(format!("surrogate key {s:?}: {e}")))
    }
}
