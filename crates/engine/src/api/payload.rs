//! JSON request bodies.
//!
//! A body that does not parse, or that names a field the payload does not
//! have, is a validation failure carrying the request id, like any other
//! malformed input.

use axum::extract::{FromRequest, Request};
use axum::Json;
use docstore_domain::DomainError;
use serde::de::DeserializeOwned;

use super::caller::Caller;
use super::http::ApiError;
use crate::use_cases::ServiceError;

/// Extractor for a JSON body of type `T`.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Caller(ctx) = Caller::from_headers(req.headers());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let detail = rejection.body_text();
                tracing::warn!(
                    request_id = %ctx.request_id,
                    user_id = ctx.claimed_user(),
                    error = %detail,
                    "Rejected request body"
                );
                Err(ApiError(ServiceError::validation(
                    &ctx.request_id,
                    DomainError::parse(detail),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use docstore_domain::TaxScheme;
    use docstore_shared::ErrorCode;

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header("x-request-id", "req-body")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let Payload(scheme) =
            Payload::<TaxScheme>::from_request(json_request(r#"{"code":"VAT"}"#), &())
                .await
                .unwrap();
        assert_eq!(scheme.code, "VAT");
    }

    #[tokio::test]
    async fn unknown_field_is_a_validation_failure() {
        let err = Payload::<TaxScheme>::from_request(
            json_request(r#"{"code":"VAT","rate":"21"}"#),
            &(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0.code(), ErrorCode::Validation);
        assert_eq!(err.0.request_id(), "req-body");
    }

    #[tokio::test]
    async fn broken_json_is_a_validation_failure() {
        let err = Payload::<TaxScheme>::from_request(json_request("{\"code\":"), &())
            .await
            .unwrap_err();
        assert_eq!(err.0.code(), ErrorCode::Validation);
    }
}
