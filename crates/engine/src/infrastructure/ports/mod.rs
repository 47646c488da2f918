//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Database access (documents, parties, sub-resources)
//! - Caller identity resolution
//! - Clock (for testing)

mod error;
mod identity;
mod repos;
mod testing;

pub use error::{IdentityError, RepoError};
pub use identity::{CallerContext, IdentityPort, UserRecord};
pub use repos::{DocumentRepo, PartyRepo, SubResourceRepo, TaxSchemeRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use identity::MockIdentityPort;
#[cfg(test)]
pub use repos::{MockPartyRepo, MockSubResourceRepo, MockTaxSchemeRepo};
#[cfg(test)]
pub use testing::MockClockPort;
