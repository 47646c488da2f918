//! Response bodies returned by the document service.

use serde::{Deserialize, Serialize};

use docstore_domain::Page;

/// Failure classification visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input, rejected before storage was touched.
    Validation,
    NotFound,
    /// A storage operation failed; any composite write was rolled back.
    Persistence,
    /// The caller could not be resolved to a user.
    Identity,
}

/// Error body. Details stay in the server log; `request_id` finds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorCode,
    pub message: String,
    pub request_id: String,
}

/// Empty acknowledgement of an update or delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {}

/// One page of a listing; `next_cursor == "0"` means no further pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub next_cursor: String,
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
        }
    }
}
