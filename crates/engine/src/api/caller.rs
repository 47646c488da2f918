//! Caller identity taken from request headers.
//!
//! Nothing is rejected here: a missing user id surfaces later, when a write
//! asks the identity port to resolve the caller.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderValue},
};
use docstore_shared::{REQUEST_ID_HEADER, USER_EMAIL_HEADER, USER_ID_HEADER};
use std::convert::Infallible;
use uuid::Uuid;

use crate::infrastructure::ports::CallerContext;

/// Extractor for the caller context in handlers.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerContext);

impl Caller {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id =
            header(headers, REQUEST_ID_HEADER).unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut ctx = CallerContext::new(request_id);
        if let Some(user_id) = header(headers, USER_ID_HEADER) {
            ctx = ctx.with_user(user_id);
        }
        if let Some(email) = header(headers, USER_EMAIL_HEADER) {
            ctx = ctx.with_email(email);
        }
        Self(ctx)
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = Self::from_headers(&parts.headers);
        // Later extractors see the same request id.
        if let Ok(value) = HeaderValue::from_str(&caller.0.request_id) {
            parts.headers.insert(REQUEST_ID_HEADER, value);
        }
        Ok(caller)
    }
}
