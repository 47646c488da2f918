//! Repository port traits for database access.

use async_trait::async_trait;
use docstore_domain::*;

use super::error::RepoError;

// =============================================================================
// Composite documents
// =============================================================================

/// Storage of one document kind: a header, its sub-resources and its lines.
///
/// `create` is all-or-nothing. Reads by external id see active rows only;
/// reads by surrogate key are the internal join path and ignore status.
#[async_trait]
pub trait DocumentRepo<K: DocumentKind>: Send + Sync {
    async fn create(&self, doc: NewDocumentOf<K>, stamp: &Stamp)
        -> Result<DocumentOf<K>, RepoError>;
    async fn get(&self, id: ExternalId) -> Result<Option<DocumentOf<K>>, RepoError>;
    async fn get_by_key(&self, key: RowId) -> Result<Option<DocumentOf<K>>, RepoError>;
    /// Active headers, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<Record<K::Header>>, RepoError>;
    async fn update(&self, id: ExternalId, update: &K::Update, stamp: &Stamp)
        -> Result<(), RepoError>;
    /// Flips the header and its lines to inactive.
    async fn deactivate(&self, id: ExternalId, stamp: &Stamp) -> Result<(), RepoError>;
}

// =============================================================================
// Party hierarchy
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartyRepo: Send + Sync {
    async fn create_root(&self, party: NewParty, stamp: &Stamp) -> Result<Party, RepoError>;
    /// Inserts a child and its relationship row and bumps the parent's
    /// counters in one transaction. Fails with `NotFound` when the parent is
    /// missing or inactive.
    async fn create_child(
        &self,
        parent_key: RowId,
        party: NewParty,
        stamp: &Stamp,
    ) -> Result<CreatedChild, RepoError>;
    async fn get(&self, id: ExternalId) -> Result<Option<Party>, RepoError>;
    async fn get_by_key(&self, key: RowId) -> Result<Option<Party>, RepoError>;
    async fn list(&self, page: PageRequest) -> Result<Page<Party>, RepoError>;
    /// Active children of the party, oldest first.
    async fn list_children(&self, parent_key: RowId) -> Result<Vec<Party>, RepoError>;
    async fn update(&self, id: ExternalId, update: &PartyUpdate, stamp: &Stamp)
        -> Result<(), RepoError>;
    async fn deactivate(&self, id: ExternalId, stamp: &Stamp) -> Result<(), RepoError>;
}

// =============================================================================
// Sub-resources
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxSchemeRepo: Send + Sync {
    async fn create(&self, scheme: TaxScheme, stamp: &Stamp)
        -> Result<Record<TaxScheme>, RepoError>;
    async fn get(&self, id: ExternalId) -> Result<Option<Record<TaxScheme>>, RepoError>;
    async fn get_by_key(&self, key: RowId) -> Result<Option<Record<TaxScheme>>, RepoError>;
    async fn list(&self, page: PageRequest) -> Result<Page<Record<TaxScheme>>, RepoError>;
    async fn update(
        &self,
        id: ExternalId,
        update: &TaxSchemeUpdate,
        stamp: &Stamp,
    ) -> Result<(), RepoError>;
    async fn deactivate(&self, id: ExternalId, stamp: &Stamp) -> Result<(), RepoError>;
}

/// Point lookups of attached addresses and locations by surrogate key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubResourceRepo: Send + Sync {
    async fn get_address(&self, key: RowId) -> Result<Option<Record<Address>>, RepoError>;
    async fn get_location(&self, key: RowId) -> Result<Option<Record<Location>>, RepoError>;
}
