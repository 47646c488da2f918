//! Point lookups of attached sub-resources by surrogate key.

use std::sync::Arc;

use docstore_domain::{Address, Location, Record};

use crate::infrastructure::ports::{CallerContext, SubResourceRepo};

use super::error::ServiceError;
use super::support::{logged, parse_key, storage};

pub struct SubResourceService {
    repo: Arc<dyn SubResourceRepo>,
}

impl SubResourceService {
    pub fn new(repo: Arc<dyn SubResourceRepo>) -> Self {
        Self { repo }
    }

    pub async fn address(&self, ctx: &CallerContext, key: &str) -> Result<Record<Address>, ServiceError> {
        const KIND: &str = "address";
        let key = parse_key(ctx, KIND, key)?;
        self.repo
            .get_address(key)
            .await
            .map_err(storage(ctx, KIND))?
            .ok_or_else(|| logged(ctx, KIND, ServiceError::not_found(&ctx.request_id, KIND, key)))
    }

    pub async fn location(&self, ctx: &CallerContext, key: &str) -> Result<Record<Location>, ServiceError> {
        const KIND: &str = "location";
        let key = parse_key(ctx, KIND, key)?;
        self.repo
            .get_location(key)
            .await
            .map_err(storage(ctx, KIND))?
            .ok_or_else(|| logged(ctx, KIND, ServiceError::not_found(&ctx.request_id, KIND, key)))
    }
}
