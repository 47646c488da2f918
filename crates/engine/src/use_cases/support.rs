//! Steps every use case shares: caller resolution, input parsing, failure logging.

use std::sync::Arc;

use docstore_domain::{DomainError, ExternalId, PageRequest, RowId, Stamp};
use docstore_shared::ListQuery;

use crate::infrastructure::ports::{CallerContext, ClockPort, IdentityPort, RepoError};

use super::error::ServiceError;

/// Resolves the caller of a write and stamps it with the current time.
#[derive(Clone)]
pub struct WriteGate {
    identity: Arc<dyn IdentityPort>,
    clock: Arc<dyn ClockPort>,
}

impl WriteGate {
    pub fn new(identity: Arc<dyn IdentityPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { identity, clock }
    }

    pub async fn stamp(&self, ctx: &CallerContext, kind: &'static str) -> Result<Stamp, ServiceError> {
        match self.identity.resolve(ctx).await {
            Ok(user) => Ok(Stamp::new(user.user_id, self.clock.now())),
            Err(e) => Err(logged(ctx, kind, ServiceError::identity(&ctx.request_id, e))),
        }
    }
}

/// Logs a failure with the caller's identity and request id, then hands it back.
pub fn logged(ctx: &CallerContext, kind: &'static str, err: ServiceError) -> ServiceError {
    match &err {
        ServiceError::Persistence { source, .. } => tracing::error!(
            request_id = %ctx.request_id,
            user_id = %ctx.claimed_user(),
            kind,
            error = %source,
            "Storage operation failed"
        ),
        other => tracing::warn!(
            request_id = %ctx.request_id,
            user_id = %ctx.claimed_user(),
            kind,
            code = ?other.code(),
            error = %other,
            "Request rejected"
        ),
    }
    err
}

/// Maps a storage failure onto the caller-facing kinds and logs it.
pub fn storage<'a>(
    ctx: &'a CallerContext,
    kind: &'static str,
) -> impl FnOnce(RepoError) -> ServiceError + 'a {
    move |e| logged(ctx, kind, ServiceError::from_repo(&ctx.request_id, kind, e))
}

pub fn validated(
    ctx: &CallerContext,
    kind: &'static str,
    result: Result<(), DomainError>,
) -> Result<(), ServiceError> {
    result.map_err(|e| logged(ctx, kind, ServiceError::validation(&ctx.request_id, e)))
}

pub fn parse_id(ctx: &CallerContext, kind: &'static str, raw: &str) -> Result<ExternalId, ServiceError> {
    ExternalId::parse(raw).map_err(|e| logged(ctx, kind, ServiceError::validation(&ctx.request_id, e)))
}

/// Surrogate keys are positive; the parent sentinel 0 is never addressable.
pub fn parse_key(ctx: &CallerContext, kind: &'static str, raw: &str) -> Result<RowId, ServiceError> {
    let key = raw
        .parse::<RowId>()
        .map_err(|e| logged(ctx, kind, ServiceError::validation(&ctx.request_id, e)))?;
    if key.get() <= 0 {
        let e = DomainError::validation(format!("surrogate key must be positive, got {key}"));
        return Err(logged(ctx, kind, ServiceError::validation(&ctx.request_id, e)));
    }
    Ok(key)
}

pub fn parse_page(
    ctx: &CallerContext,
    kind: &'static str,
    query: &ListQuery,
) -> Result<PageRequest, ServiceError> {
    PageRequest::parse(query.page_size.as_deref(), query.cursor.as_deref())
        .map_err(|e| logged(ctx, kind, ServiceError::validation(&ctx.request_id, e)))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use docstore_domain::{PageStart, DEFAULT_PAGE_SIZE};
    use docstore_shared::ErrorCode;

    use super::*;
    use crate::infrastructure::ports::{IdentityError, MockClockPort, MockIdentityPort, UserRecord};

    fn ctx() -> CallerContext {
        CallerContext::new("req-1").with_user("u-1")
    }

    #[tokio::test]
    async fn stamp_uses_resolved_user_and_clock() {
        let at = Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap();
        let mut identity = MockIdentityPort::new();
        identity.expect_resolve().returning(|caller| {
            Ok(UserRecord {
                user_id: format!("resolved-{}", caller.claimed_user()),
                email: None,
            })
        });
        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).return_const(at);

        let gate = WriteGate::new(Arc::new(identity), Arc::new(clock));
        let stamp = gate.stamp(&ctx(), "shipment").await.unwrap();
        assert_eq!(stamp.actor, "resolved-u-1");
        assert_eq!(stamp.at, at);
    }

    #[tokio::test]
    async fn unresolved_caller_never_reads_the_clock() {
        let mut identity = MockIdentityPort::new();
        identity
            .expect_resolve()
            .returning(|_| Err(IdentityError::Lookup("directory offline".into())));
        let mut clock = MockClockPort::new();
        clock.expect_now().never();

        let gate = WriteGate::new(Arc::new(identity), Arc::new(clock));
        let err = gate.stamp(&ctx(), "shipment").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Identity);
        assert_eq!(err.request_id(), "req-1");
    }

    #[test]
    fn keys_must_be_positive_integers() {
        assert_eq!(parse_key(&ctx(), "party", "7").unwrap(), RowId::new(7));
        assert_eq!(parse_key(&ctx(), "party", "0").unwrap_err().code(), ErrorCode::Validation);
        assert_eq!(parse_key(&ctx(), "party", "abc").unwrap_err().code(), ErrorCode::Validation);
    }

    #[test]
    fn malformed_identifier_is_a_validation_failure() {
        let err = parse_id(&ctx(), "party", "not-an-id").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn list_query_maps_onto_a_page_request() {
        let page = parse_page(&ctx(), "party", &ListQuery::default()).unwrap();
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.start, PageStart::Top);

        let large = ListQuery {
            page_size: Some("500".into()),
            cursor: None,
        };
        assert_eq!(parse_page(&ctx(), "party", &large).unwrap().limit, 500);

        let bad = ListQuery {
            page_size: Some("0".into()),
            cursor: None,
        };
        assert_eq!(parse_page(&ctx(), "party", &bad).unwrap_err().code(), ErrorCode::Validation);
    }
}
