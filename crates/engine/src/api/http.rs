//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use docstore_domain::{
    Address, ConsignmentKind, CreatedChild, DespatchAdviceKind, DocumentKind, DocumentOf,
    Location, Party, PartyUpdate, PurchaseOrderKind, ReceiptAdviceKind, Record, ShipmentKind,
    TaxScheme, TaxSchemeUpdate,
};
use docstore_shared::{
    Ack, CreateDocumentRequest, CreatePartyRequest, ErrorBody, ErrorCode, ListQuery, ListResponse,
};

use super::caller::Caller;
use super::payload::Payload;
use crate::app::App;
use crate::use_cases::{DocumentService, ServiceError};

/// A document kind exposed under `/api/{PATH}`.
pub trait ServedDocument: DocumentKind + Sized {
    const PATH: &'static str;

    fn service(app: &App) -> &DocumentService<Self>;
}

impl ServedDocument for PurchaseOrderKind {
    const PATH: &'static str = "purchase-orders";

    fn service(app: &App) -> &DocumentService<Self> {
        &app.use_cases.purchase_orders
    }
}

impl ServedDocument for ShipmentKind {
    const PATH: &'static str = "shipments";

    fn service(app: &App) -> &DocumentService<Self> {
        &app.use_cases.shipments
    }
}

impl ServedDocument for DespatchAdviceKind {
    const PATH: &'static str = "despatch-advices";

    fn service(app: &App) -> &DocumentService<Self> {
        &app.use_cases.despatch_advices
    }
}

impl ServedDocument for ReceiptAdviceKind {
    const PATH: &'static str = "receipt-advices";

    fn service(app: &App) -> &DocumentService<Self> {
        &app.use_cases.receipt_advices
    }
}

impl ServedDocument for ConsignmentKind {
    const PATH: &'static str = "consignments";

    fn service(app: &App) -> &DocumentService<Self> {
        &app.use_cases.consignments
    }
}

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .merge(document_routes::<PurchaseOrderKind>())
        .merge(document_routes::<ShipmentKind>())
        .merge(document_routes::<DespatchAdviceKind>())
        .merge(document_routes::<ReceiptAdviceKind>())
        .merge(document_routes::<ConsignmentKind>())
        .route("/api/parties", get(list_parties).post(create_root_party))
        .route("/api/parties/by-key/{key}", get(get_party_by_key))
        .route(
            "/api/parties/{id}",
            get(get_party).patch(update_party).delete(delete_party),
        )
        .route(
            "/api/parties/{id}/children",
            get(list_children).post(create_child_party),
        )
        .route("/api/tax-schemes", get(list_tax_schemes).post(create_tax_scheme))
        .route(
            "/api/tax-schemes/{id}",
            get(get_tax_scheme)
                .patch(update_tax_scheme)
                .delete(delete_tax_scheme),
        )
        .route("/api/addresses/{key}", get(get_address))
        .route("/api/locations/{key}", get(get_location))
}

fn document_routes<K: ServedDocument>() -> Router<Arc<App>> {
    let base = format!("/api/{}", K::PATH);
    Router::new()
        .route(&base, get(list_documents::<K>).post(create_document::<K>))
        .route(&format!("{base}/by-key/{{key}}"), get(get_document_by_key::<K>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_document::<K>)
                .patch(update_document::<K>)
                .delete(delete_document::<K>),
        )
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Documents
// =============================================================================

async fn create_document<K: ServedDocument>(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Payload(body): Payload<CreateDocumentRequest<K::NewHeader, K::NewLine>>,
) -> Result<(StatusCode, Json<DocumentOf<K>>), ApiError> {
    let doc = K::service(&app).create(&ctx, body).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

async fn list_documents<K: ServedDocument>(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Record<K::Header>>>, ApiError> {
    let page = K::service(&app).list(&ctx, &query).await?;
    Ok(Json(page.into()))
}

async fn get_document<K: ServedDocument>(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<DocumentOf<K>>, ApiError> {
    Ok(Json(K::service(&app).get(&ctx, &id).await?))
}

async fn get_document_by_key<K: ServedDocument>(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(key): Path<String>,
) -> Result<Json<DocumentOf<K>>, ApiError> {
    Ok(Json(K::service(&app).get_by_key(&ctx, &key).await?))
}

async fn update_document<K: ServedDocument>(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    Payload(update): Payload<K::Update>,
) -> Result<Json<Ack>, ApiError> {
    K::service(&app).update(&ctx, &id, update).await?;
    Ok(Json(Ack::default()))
}

async fn delete_document<K: ServedDocument>(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    K::service(&app).delete(&ctx, &id).await?;
    Ok(Json(Ack::default()))
}

// =============================================================================
// Parties
// =============================================================================

async fn create_root_party(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Payload(party): Payload<CreatePartyRequest>,
) -> Result<(StatusCode, Json<Party>), ApiError> {
    let root = app.use_cases.parties.create_root(&ctx, party).await?;
    Ok((StatusCode::CREATED, Json(root)))
}

async fn create_child_party(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(parent_id): Path<String>,
    Payload(party): Payload<CreatePartyRequest>,
) -> Result<(StatusCode, Json<CreatedChild>), ApiError> {
    let created = app
        .use_cases
        .parties
        .create_child(&ctx, &parent_id, party)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_parties(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Party>>, ApiError> {
    let page = app.use_cases.parties.list(&ctx, &query).await?;
    Ok(Json(page.into()))
}

async fn get_party(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Party>, ApiError> {
    Ok(Json(app.use_cases.parties.get(&ctx, &id).await?))
}

async fn get_party_by_key(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(key): Path<String>,
) -> Result<Json<Party>, ApiError> {
    Ok(Json(app.use_cases.parties.get_by_key(&ctx, &key).await?))
}

async fn list_children(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<Party>>, ApiError> {
    Ok(Json(app.use_cases.parties.children(&ctx, &id).await?))
}

async fn update_party(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    Payload(update): Payload<PartyUpdate>,
) -> Result<Json<Ack>, ApiError> {
    app.use_cases.parties.update(&ctx, &id, update).await?;
    Ok(Json(Ack::default()))
}

async fn delete_party(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    app.use_cases.parties.delete(&ctx, &id).await?;
    Ok(Json(Ack::default()))
}

// =============================================================================
// Tax schemes and sub-resources
// =============================================================================

async fn create_tax_scheme(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Payload(scheme): Payload<TaxScheme>,
) -> Result<(StatusCode, Json<Record<TaxScheme>>), ApiError> {
    let created = app.use_cases.tax_schemes.create(&ctx, scheme).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_tax_schemes(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Record<TaxScheme>>>, ApiError> {
    let page = app.use_cases.tax_schemes.list(&ctx, &query).await?;
    Ok(Json(page.into()))
}

async fn get_tax_scheme(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Record<TaxScheme>>, ApiError> {
    Ok(Json(app.use_cases.tax_schemes.get(&ctx, &id).await?))
}

async fn update_tax_scheme(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    Payload(update): Payload<TaxSchemeUpdate>,
) -> Result<Json<Ack>, ApiError> {
    app.use_cases.tax_schemes.update(&ctx, &id, update).await?;
    Ok(Json(Ack::default()))
}

async fn delete_tax_scheme(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    app.use_cases.tax_schemes.delete(&ctx, &id).await?;
    Ok(Json(Ack::default()))
}

async fn get_address(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(key): Path<String>,
) -> Result<Json<Record<Address>>, ApiError> {
    Ok(Json(app.use_cases.sub_resources.address(&ctx, &key).await?))
}

async fn get_location(
    State(app): State<Arc<App>>,
    Caller(ctx): Caller,
    Path(key): Path<String>,
) -> Result<Json<Record<Location>>, ApiError> {
    Ok(Json(app.use_cases.sub_resources.location(&ctx, &key).await?))
}

// =============================================================================
// Errors
// =============================================================================

/// HTTP face of a [`ServiceError`]. Storage details never reach the body;
/// the request id points at the log line that has them.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let code = self.0.code();
        let status = match code {
            ErrorCode::Validation => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Identity => StatusCode::UNAUTHORIZED,
        };
        let message = match &self.0 {
            ServiceError::Persistence { .. } => "Storage operation failed".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: code,
            message,
            request_id: self.0.request_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
