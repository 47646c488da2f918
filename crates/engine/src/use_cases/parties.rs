//! Party hierarchy operations.

use std::sync::Arc;

use docstore_domain::{CreatedChild, NewParty, Page, Party, PartyUpdate, Validate};
use docstore_shared::ListQuery;

use crate::infrastructure::ports::{CallerContext, PartyRepo};

use super::error::ServiceError;
use super::support::{logged, parse_id, parse_key, parse_page, storage, validated, WriteGate};

const KIND: &str = "party";

pub struct PartyService {
    repo: Arc<dyn PartyRepo>,
    gate: WriteGate,
}

impl PartyService {
    pub fn new(repo: Arc<dyn PartyRepo>, gate: WriteGate) -> Self {
        Self { repo, gate }
    }

    pub async fn create_root(&self, ctx: &CallerContext, party: NewParty) -> Result<Party, ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        validated(ctx, KIND, party.validate())?;

        let root = self.repo.create_root(party, &stamp).await.map_err(storage(ctx, KIND))?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %stamp.actor,
            key = %root.key,
            id = %root.id,
            "Root party created"
        );
        Ok(root)
    }

    /// Adds a child under the active party `parent_id`. The parent's child
    /// count and leaf flag change in the same transaction as the insert.
    pub async fn create_child(
        &self,
        ctx: &CallerContext,
        parent_id: &str,
        party: NewParty,
    ) -> Result<CreatedChild, ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        let parent_id = parse_id(ctx, KIND, parent_id)?;
        validated(ctx, KIND, party.validate())?;

        let parent = self
            .repo
            .get(parent_id)
            .await
            .map_err(storage(ctx, KIND))?
            .ok_or_else(|| logged(ctx, KIND, ServiceError::not_found(&ctx.request_id, KIND, parent_id)))?;

        let created = self
            .repo
            .create_child(parent.key, party, &stamp)
            .await
            .map_err(storage(ctx, KIND))?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %stamp.actor,
            key = %created.child.key,
            parent_key = %created.parent.parent_key,
            child_count = created.parent.child_count,
            "Child party created"
        );
        Ok(created)
    }

    pub async fn get(&self, ctx: &CallerContext, id: &str) -> Result<Party, ServiceError> {
        let id = parse_id(ctx, KIND, id)?;
        self.repo
            .get(id)
            .await
            .map_err(storage(ctx, KIND))?
            .ok_or_else(|| logged(ctx, KIND, ServiceError::not_found(&ctx.request_id, KIND, id)))
    }

    pub async fn get_by_key(&self, ctx: &CallerContext, key: &str) -> Result<Party, ServiceError> {
        let key = parse_key(ctx, KIND, key)?;
        self.repo
            .get_by_key(key)
            .await
            .map_err(storage(ctx, KIND))?
            .ok_or_else(|| logged(ctx, KIND, ServiceError::not_found(&ctx.request_id, KIND, key)))
    }

    pub async fn list(&self, ctx: &CallerContext, query: &ListQuery) -> Result<Page<Party>, ServiceError> {
        let page = parse_page(ctx, KIND, query)?;
        self.repo.list(page).await.map_err(storage(ctx, KIND))
    }

    /// Active children of the active party `id`, oldest first.
    pub async fn children(&self, ctx: &CallerContext, id: &str) -> Result<Vec<Party>, ServiceError> {
        let parent = self.get(ctx, id).await?;
        self.repo.list_children(parent.key).await.map_err(storage(ctx, KIND))
    }

    pub async fn update(
        &self,
        ctx: &CallerContext,
        id: &str,
        update: PartyUpdate,
    ) -> Result<(), ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        let id = parse_id(ctx, KIND, id)?;
        validated(ctx, KIND, update.validate())?;
        self.repo.update(id, &update, &stamp).await.map_err(storage(ctx, KIND))
    }

    /// Logical delete. The parent's counters are left as they are.
    pub async fn delete(&self, ctx: &CallerContext, id: &str) -> Result<(), ServiceError> {
        let stamp = self.gate.stamp(ctx, KIND).await?;
        let id = parse_id(ctx, KIND, id)?;
        self.repo.deactivate(id, &stamp).await.map_err(storage(ctx, KIND))?;
        tracing::info!(request_id = %ctx.request_id, id = %id, "Party deactivated");
        Ok(())
    }
}
