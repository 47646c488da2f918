//! DateTime parsing utilities with consistent error handling.
//!
//! Stored timestamps are always UTC, truncated to whole seconds and rendered
//! as RFC 3339 with a `Z` suffix, so that text comparison in storage agrees
//! with chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};

use crate::error::DomainError;

/// Layout of document dates such as an order's issue date.
pub const DOCUMENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an RFC3339 timestamp string, returning an error if parsing fails.
///
/// # Examples
///
/// ```
/// use docstore_domain::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
/// assert_eq!(dt.year(), 2024);
/// ```
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Drops sub-second precision.
pub fn canonical_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}

/// Storage form of a timestamp: canonical UTC, `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    canonical_timestamp(at).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Reads a stored timestamp back, normalizing any offset to UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DomainError> {
    parse_datetime(s)
        .map(canonical_timestamp)
        .map_err(|e| DomainError::parse(format!("timestamp {s:?}: {e}")))
}

/// Validates a document date (`YYYY-MM-DD`).
pub fn parse_document_date(field: &'static str, s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DOCUMENT_DATE_FORMAT)
        .map_err(|e| DomainError::validation(format!("{field} {s:?} is not a YYYY-MM-DD date: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_datetime_valid() {
        let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_datetime_with_timezone() {
        let dt = parse_datetime("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(dt.hour(), 5);
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-date").is_err());
        assert!(parse_datetime("").is_err());
        assert!(parse_datetime("2024-01-15").is_err());
    }

    #[test]
    fn canonical_form_drops_fractional_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 42).unwrap()
            + chrono::Duration::milliseconds(987);
        assert_eq!(canonical_timestamp(at).nanosecond(), 0);
        assert_eq!(format_timestamp(at), "2024-03-01T08:15:42Z");
    }

    #[test]
    fn offsets_are_normalized_on_read() {
        let at = parse_timestamp("2024-03-01T10:15:42.250+02:00").unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T08:15:42Z");
    }

    #[test]
    fn stored_form_reads_back_unchanged() {
        let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(parse_timestamp(&format_timestamp(at)).unwrap(), at);
    }

    #[test]
    fn document_dates_must_be_calendar_dates() {
        assert!(parse_document_date("issue_date", "2024-02-29").is_ok());
        assert!(parse_document_date("issue_date", "2023-02-29").is_err());
        assert!(parse_document_date("issue_date", "15/01/2024").is_err());

        let err = parse_document_date("issue_date", "soon").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("issue_date"));
    }
}
