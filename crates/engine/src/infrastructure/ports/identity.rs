//! Caller identity: who is asking, and under which request id.

use async_trait::async_trait;

use super::error::IdentityError;

/// What the transport knows about the caller before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: Option<String>,
    pub email: Option<String>,
    /// Correlates every log line and error body of one request.
    pub request_id: String,
}

impl CallerContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            user_id: None,
            email: None,
            request_id: request_id.into(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The user id as logged before resolution.
    pub fn claimed_user(&self) -> &str {
        self.user_id.as_deref().unwrap_or("-")
    }
}

/// A resolved user; `user_id` is what audit columns record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub email: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityPort: Send + Sync {
    async fn resolve(&self, caller: &CallerContext) -> Result<UserRecord, IdentityError>;
}
