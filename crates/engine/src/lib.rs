//! Docstore Engine library.
//!
//! Persists composite supply-chain documents and the party hierarchy.
//!
//! ## Structure
//!
//! - `use_cases/` - caller-facing operations: identity, validation, logging
//! - `infrastructure/` - ports and their SQLite, identity and clock adapters
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
