//! Identity adapter that trusts the caller headers set by the gateway.

use async_trait::async_trait;

use crate::infrastructure::ports::{CallerContext, IdentityError, IdentityPort, UserRecord};

/// Resolves a caller to the user id it presents. Requests without a user id
/// are rejected; the email, when present, is carried along.
#[derive(Debug, Clone, Default)]
pub struct HeaderIdentity;

impl HeaderIdentity {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityPort for HeaderIdentity {
    async fn resolve(&self, caller: &CallerContext) -> Result<UserRecord, IdentityError> {
        let user_id = caller
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(IdentityError::Anonymous)?;

        Ok(UserRecord {
            user_id: user_id.to_string(),
            email: caller
                .email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(str::to_string),
        })
    }
}
