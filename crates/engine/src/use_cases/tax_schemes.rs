//! Standalone tax scheme management.

use std::sync::Arc;

use docstore_domain::{Page, Record, TaxScheme, TaxSchemeUpdate, Validate};
use docstore_shared::ListQuery;

use crate::infrastructure::ports::{CallerContext, TaxSchemeRepo};

use super::error::ServiceError;
use super::support::{logged, parse_id, parse_page, storage, validated, WriteGate};

const KIND: &str = "tax_scheme";

pub struct TaxSchemeService {
    repo: Arc<dyn TaxSchemeRepo>,
    gate: WriteGate,
}

impl TaxSchemeService {
    pub fn new(repo: Arc<dyn TaxSchemeRepo>, gate: WriteGate) -> Self {
        Self { repo, gate }
    }

    pub async fn create(
        &self,
        ctx: &CallerContext,
        scheme: TaxScheme,
    ) -> Result<Record<TaxScheme>, ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        validated(ctx, KIND, scheme.validate())?;
        self.repo.create(scheme, &stamp).await.map_err(storage(ctx, KIND))
    }

    pub async fn get(&self, ctx: &CallerContext, id: &str) -> Result<Record<TaxScheme>, ServiceError> {
        let id = parse_id(ctx, KIND, id)?;
        self.repo
            .get(id)
            .await
            .map_err(storage(ctx, KIND))?
            .ok_or_else(|| logged(ctx, KIND, ServiceError::not_found(&ctx.request_id, KIND, id)))
    }

    pub async fn list(
        &self,
        ctx: &CallerContext,
        query: &ListQuery,
    ) -> Result<Page<Record<TaxScheme>>, ServiceError> {
        let page = parse_page(ctx, KIND, query)?;
        self.repo.list(page).await.map_err(storage(ctx, KIND))
    }

    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: &str,
        update: TaxSchemeUpdate,
    ) -> Result<(), ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        let id = parse_id(ctx, KIND, id)?;
        validated(ctx, KIND, update.validate())?;
        self.repo.update(id, &update, &stamp).await.map_err(storage(ctx, KIND))
    }

    pub async fn delete(&self, ctx: &CallerContext, id: &str) -> Result<(), ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        let id = parse_id(ctx, KIND, id)?;
        self.repo.deactivate(id, &stamp).await.map_err(storage(ctx, KIND))
    }
}
