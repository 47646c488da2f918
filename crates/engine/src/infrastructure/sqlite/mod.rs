//! SQLite persistence adapters.
//!
//! One pool serves every repository. The database runs in WAL mode with a
//! busy timeout, so concurrent writers wait for the write lock instead of
//! failing, and foreign keys are enforced.

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::ports::RepoError;

mod helpers;
mod schema;

mod document_repo;
mod documents;
mod party_repo;
mod sub_resource_repo;
mod tax_scheme_repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use document_repo::{DocumentSchema, LineTable, SqliteDocumentRepo};
pub use documents::{
    ConsignmentSchema, DespatchAdviceSchema, PurchaseOrderSchema, ReceiptAdviceSchema,
    ShipmentSchema,
};
pub use party_repo::SqlitePartyRepo;
pub use schema::ensure_schema;
pub use sub_resource_repo::SqliteSubResourceRepo;
pub use tax_scheme_repo::SqliteTaxSchemeRepo;

/// Open (creating if needed) the database file and build the pool.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(config.busy_timeout)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    tracing::info!(
        path = %config.path,
        max_connections = config.max_connections,
        "Connected to SQLite"
    );
    Ok(pool)
}

pub struct SqliteRepositories {
    pub purchase_orders: Arc<SqliteDocumentRepo<PurchaseOrderSchema>>,
    pub shipments: Arc<SqliteDocumentRepo<ShipmentSchema>>,
    pub despatch_advices: Arc<SqliteDocumentRepo<DespatchAdviceSchema>>,
    pub receipt_advices: Arc<SqliteDocumentRepo<ReceiptAdviceSchema>>,
    pub consignments: Arc<SqliteDocumentRepo<ConsignmentSchema>>,
    pub parties: Arc<SqlitePartyRepo>,
    pub tax_schemes: Arc<SqliteTaxSchemeRepo>,
    pub sub_resources: Arc<SqliteSubResourceRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            purchase_orders: Arc::new(SqliteDocumentRepo::new(pool.clone(), PurchaseOrderSchema)),
            shipments: Arc::new(SqliteDocumentRepo::new(pool.clone(), ShipmentSchema)),
            despatch_advices: Arc::new(SqliteDocumentRepo::new(pool.clone(), DespatchAdviceSchema)),
            receipt_advices: Arc::new(SqliteDocumentRepo::new(pool.clone(), ReceiptAdviceSchema)),
            consignments: Arc::new(SqliteDocumentRepo::new(pool.clone(), ConsignmentSchema)),
            parties: Arc::new(SqlitePartyRepo::new(pool.clone())),
            tax_schemes: Arc::new(SqliteTaxSchemeRepo::new(pool.clone())),
            sub_resources: Arc::new(SqliteSubResourceRepo::new(pool)),
        }
    }
}
