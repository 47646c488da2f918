//! Pure helpers shared by every document kind.
//!
//! No I/O lives here: only conversions between the forms callers send, the
//! forms storage keeps, and the canonical forms used for comparison.

pub mod datetime;
pub mod decimal;
pub mod text;

pub use datetime::{
    canonical_timestamp, format_timestamp, parse_datetime, parse_document_date, parse_timestamp,
};
pub use decimal::validate_decimal;
pub use text::{require_country_code, require_non_empty};
