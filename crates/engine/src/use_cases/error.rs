//! Failure type shared by every use case.

use docstore_domain::DomainError;
use docstore_shared::ErrorCode;

use crate::infrastructure::ports::{IdentityError, RepoError};

/// The four failure kinds a caller can observe. Each carries the request id
/// so the caller can find the detailed log line.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid input: {source}")]
    Validation {
        request_id: String,
        source: DomainError,
    },

    #[error("{entity} not found: {id}")]
    NotFound {
        request_id: String,
        entity: &'static str,
        id: String,
    },

    #[error("Persistence failure for {kind}: {source}")]
    Persistence {
        request_id: String,
        kind: &'static str,
        source: RepoError,
    },

    #[error("Identity resolution failed: {source}")]
    Identity {
        request_id: String,
        source: IdentityError,
    },
}

impl ServiceError {
    pub fn validation(request_id: &str, source: DomainError) -> Self {
        Self::Validation {
            request_id: request_id.to_string(),
            source,
        }
    }

    pub fn not_found(request_id: &str, entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            request_id: request_id.to_string(),
            entity,
            id: id.to_string(),
        }
    }

    /// Storage not-found stays not-found; everything else is a persistence failure.
    pub fn from_repo(request_id: &str, kind: &'static str, source: RepoError) -> Self {
        match source {
            RepoError::NotFound { entity_type, id } => Self::NotFound {
                request_id: request_id.to_string(),
                entity: entity_type,
                id,
            },
            source => Self::Persistence {
                request_id: request_id.to_string(),
                kind,
                source,
            },
        }
    }

    pub fn identity(request_id: &str, source: IdentityError) -> Self {
        Self::Identity {
            request_id: request_id.to_string(),
            source,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            Self::Validation { request_id, .. }
            | Self::NotFound { request_id, .. }
            | Self::Persistence { request_id, .. }
            | Self::Identity { request_id, .. } => request_id,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::Validation,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Persistence { .. } => ErrorCode::Persistence,
            Self::Identity { .. } => ErrorCode::Identity,
        }
    }
}
