//! Composite document operations, one service per document kind.

use std::sync::Arc;

use docstore_domain::{DocumentKind, DocumentOf, NewDocumentOf, Page, Record, Validate};
use docstore_shared::ListQuery;

use crate::infrastructure::ports::{CallerContext, DocumentRepo};

use super::error::ServiceError;
use super::support::{logged, parse_id, parse_key, parse_page, storage, validated, WriteGate};

pub struct DocumentService<K: DocumentKind> {
    repo: Arc<dyn DocumentRepo<K>>,
    gate: WriteGate,
}

impl<K: DocumentKind> DocumentService<K> {
    pub fn new(repo: Arc<dyn DocumentRepo<K>>, gate: WriteGate) -> Self {
        Self { repo, gate }
    }

    /// Writes the header, its sub-resources and its lines as one unit.
    ///
    /// The caller is resolved before the payload is validated; nothing is
    /// written unless both succeed.
    pub async fn create(
        &self,
        ctx: &CallerContext,
        doc: NewDocumentOf<K>,
    ) -> Result<DocumentOf<K>, ServiceError> {
        let stamp = self.gate.stamp(ctx, K::NAME).await?;
        validated(ctx, K::NAME, doc.validate_all())?;

        let line_count = doc.lines.len();
        let created = self
            .repo
            .create(doc, &stamp)
            .await
            .map_err(storage(ctx, K::NAME))?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %stamp.actor,
            kind = K::NAME,
            key = %created.header.key,
            id = %created.header.id,
            lines = line_count,
            "Document created"
        );
        Ok(created)
    }

    pub async fn get(&self, ctx: &CallerContext, id: &str) -> Result<DocumentOf<K>, ServiceError> {
        let external_id = parse_id(ctx, K::NAME, id)?;
        self.repo
            .get(external_id)
            .await
            .map_err(storage(ctx, K::NAME))?
            .ok_or_else(|| {
                logged(ctx, K::NAME, ServiceError::not_found(&ctx.request_id, K::NAME, external_id))
            })
    }

    /// Internal join path: returns the header whatever its status.
    pub async fn get_by_key(
        &self,
        ctx: &CallerContext,
        key: &str,
    ) -> Result<DocumentOf<K>, ServiceError> {
        let key = parse_key(ctx, K::NAME, key)?;
        self.repo
            .get_by_key(key)
            .await
            .map_err(storage(ctx, K::NAME))?
            .ok_or_else(|| logged(ctx, K::NAME, ServiceError::not_found(&ctx.request_id, K::NAME, key)))
    }

    pub async fn list(
        &self,
        ctx: &CallerContext,
        query: &ListQuery,
    ) -> Result<Page<Record<K::Header>>, ServiceError> {
        let page = parse_page(ctx, K::NAME, query)?;
        self.repo
            .list(page)
            .await
            .map_err(storage(ctx, K::NAME))
    }

    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: &str,
        update: K::Update,
    ) -> Result<(), ServiceError> {
        let stamp = self.gate.stamp(ctx, K::NAME).await?;
        let external_id = parse_id(ctx, K::NAME, id)?;
        validated(ctx, K::NAME, update.validate())?;

        self.repo
            .update(external_id, &update, &stamp)
            .await
            .map_err(storage(ctx, K::NAME))?;
        tracing::debug!(request_id = %ctx.request_id, kind = K::NAME, id = %external_id, "Document updated");
        Ok(())
    }

    /// Logical delete: the header and its lines turn inactive.
    pub async fn delete(&self, ctx: &CallerContext, id: &str) -> Result<(), ServiceError> {
        let stamp = self.gate.stamp(ctx, K::NAME).await?;
        let external_id = parse_id(ctx, K::NAME, id)?;

        self.repo
            .deactivate(external_id, &stamp)
            .await
            .map_err(storage(ctx, K::NAME))?;
        tracing::info!(request_id = %ctx.request_id, kind = K::NAME, id = %external_id, "Document deactivated");
        Ok(())
    }
}
