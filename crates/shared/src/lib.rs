//! Docstore Shared - wire types for the document service boundary
//!
//! Documents travel in their domain shape; this crate adds the envelopes
//! around them: list queries and pages, acknowledgements, error bodies, and
//! the caller identity header names.

pub mod requests;
pub mod responses;

pub use requests::{
    CreateDocumentRequest, CreatePartyRequest, ListQuery, REQUEST_ID_HEADER, USER_EMAIL_HEADER,
    USER_ID_HEADER,
};
pub use responses::{Ack, ErrorBody, ErrorCode, ListResponse};
