//! API layer - HTTP entry points.

pub mod caller;
pub mod http;
pub mod payload;

pub use caller::Caller;
pub use http::{routes, ApiError};
pub use payload::Payload;
