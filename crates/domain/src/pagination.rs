//! Keyset pagination over surrogate keys.
//!
//! Listings scan in descending key order. A cursor is the base64 text of a
//! decimal key boundary; the next page holds rows with `key <= boundary`.
//! After a non-empty page the boundary is the last key minus one, so rows
//! already returned never repeat. An empty page answers with the literal
//! sentinel `"0"`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::RowId;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Next-cursor value meaning "no further pages".
pub const EXHAUSTED_CURSOR: &str = "0";

/// Inclusive upper bound of the next descending scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor(i64);

impl PageCursor {
    pub const fn at(boundary: i64) -> Self {
        Self(boundary)
    }

    /// Cursor for the page that follows a page ending at `last`.
    pub const fn after(last: RowId) -> Self {
        Self(last.get() - 1)
    }

    pub const fn boundary(self) -> i64 {
        self.0
    }

    pub fn encode(self) -> String {
        BASE64.encode(self.0.to_string())
    }

    /// Only numeric parsing is done: a token this service never issued but
    /// which happens to decode to a number is accepted as-is.
    pub fn decode(token: &str) -> Result<Self, DomainError> {
        let bytes = BASE64
            .decode(token.trim())
            .map_err(|e| DomainError::validation(format!("cursor {token:?}: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| DomainError::validation(format!("cursor {token:?} is not text")))?;
        text.parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::validation(format!("cursor {token:?}: {e}")))
    }
}

/// Where a listing starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStart {
    /// No cursor supplied: start at the highest key.
    Top,
    /// Continue from a previously issued cursor.
    From(PageCursor),
    /// The caller passed back the exhausted sentinel.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub start: PageStart,
}

impl PageRequest {
    pub const fn first(limit: u32) -> Self {
        Self {
            limit,
            start: PageStart::Top,
        }
    }

    pub const fn from_cursor(limit: u32, cursor: PageCursor) -> Self {
        Self {
            limit,
            start: PageStart::From(cursor),
        }
    }

    /// Builds a request from the raw strings callers send. Blank values count
    /// as absent; the page size must be a positive integer.
    pub fn parse(page_size: Option<&str>, cursor: Option<&str>) -> Result<Self, DomainError> {
        let limit = match page_size.map(str::trim).filter(|s| !s.is_empty()) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => {
                let size: u32 = raw.parse().map_err(|_| {
                    DomainError::validation(format!("page size {raw:?} is not a number"))
                })?;
                if size == 0 {
                    return Err(DomainError::validation("page size must be at least 1"));
                }
                size
            }
        };

        let start = match cursor.map(str::trim).filter(|s| !s.is_empty()) {
            None => PageStart::Top,
            Some(EXHAUSTED_CURSOR) => PageStart::Exhausted,
            Some(token) => PageStart::From(PageCursor::decode(token)?),
        };

        Ok(Self { limit, start })
    }
}

/// One page of a listing plus the cursor for the following page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: String,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: EXHAUSTED_CURSOR.to_string(),
        }
    }

    /// `items` must already be in descending key order.
    pub fn from_descending(items: Vec<T>, key_of: impl Fn(&T) -> RowId) -> Self {
        let next_cursor = match items.last() {
            Some(last) => PageCursor::after(key_of(last)).encode(),
            None => EXHAUSTED_CURSOR.to_string(),
        };
        Self { items, next_cursor }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_cursor == EXHAUSTED_CURSOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_base64_of_decimal_boundary() {
        let cursor = PageCursor::at(3);
        assert_eq!(cursor.encode(), "Mw==");
        assert_eq!(PageCursor::decode("Mw==").unwrap(), cursor);
    }

    #[test]
    fn cursor_after_a_page_excludes_its_last_key() {
        assert_eq!(PageCursor::after(RowId::new(4)).boundary(), 3);
    }

    #[test]
    fn undecodable_cursor_is_a_validation_failure() {
        let err = PageCursor::decode("%%%").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let not_numeric = BASE64.encode("abc");
        assert!(PageCursor::decode(&not_numeric).is_err());
    }

    #[test]
    fn page_size_defaults_and_bounds() {
        assert_eq!(PageRequest::parse(None, None).unwrap(), PageRequest::first(DEFAULT_PAGE_SIZE));
        assert_eq!(PageRequest::parse(Some(" "), Some("")).unwrap().limit, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::parse(Some("2"), None).unwrap().limit, 2);
        assert!(PageRequest::parse(Some("0"), None).is_err());
        assert_eq!(PageRequest::parse(Some("150"), None).unwrap().limit, 150);
        assert!(PageRequest::parse(Some("-3"), None).is_err());
        assert!(PageRequest::parse(Some("ten"), None).is_err());
    }

    #[test]
    fn sentinel_cursor_means_exhausted() {
        let request = PageRequest::parse(None, Some("0")).unwrap();
        assert_eq!(request.start, PageStart::Exhausted);
    }

    #[test]
    fn issued_cursor_parses_back_into_a_request() {
        let token = PageCursor::after(RowId::new(11)).encode();
        let request = PageRequest::parse(Some("5"), Some(&token)).unwrap();
        assert_eq!(request, PageRequest::from_cursor(5, PageCursor::at(10)));
    }

    #[test]
    fn next_cursor_comes_from_last_row() {
        let page = Page::from_descending(vec![5_i64, 4], |k| RowId::new(*k));
        assert_eq!(PageCursor::decode(&page.next_cursor).unwrap().boundary(), 3);
        assert!(!page.is_exhausted());

        let empty = Page::from_descending(Vec::<i64>::new(), |k| RowId::new(*k));
        assert_eq!(empty.next_cursor, EXHAUSTED_CURSOR);
        assert!(empty.is_exhausted());
    }
}
