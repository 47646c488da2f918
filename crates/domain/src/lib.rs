//! Docstore domain: the vocabulary shared by storage, use cases and the wire.
//!
//! - `ids` - external identifiers and surrogate keys
//! - `common` - timestamp, decimal and text helpers
//! - `pagination` - keyset cursors and pages
//! - `entities` - sub-resources, document kinds, parties

extern crate self as docstore_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod pagination;

pub use entities::*;
pub use error::DomainError;
pub use ids::{ExternalId, RowId, EXTERNAL_ID_LEN};
pub use pagination::{Page, PageCursor, PageRequest, PageStart, DEFAULT_PAGE_SIZE, EXHAUSTED_CURSOR};
