//! Standalone tax schemes. Attached schemes live in the same table and are
//! written by the sub-resource writer.

use async_trait::async_trait;
use docstore_domain::{
    Audit, ExternalId, Page, PageRequest, Record, RecordStatus, RowId, Stamp, TaxScheme,
    TaxSchemeUpdate,
};
use sqlx::SqlitePool;

use super::helpers::{
    deactivate_row, fetch_active, fetch_by_key, fetch_page, page_of, update_columns,
};
use super::sub_resource_repo::{insert_tax_scheme, row_to_tax_scheme, TAX_SCHEMES};
use crate::infrastructure::ports::{RepoError, TaxSchemeRepo};

pub struct SqliteTaxSchemeRepo {
    pool: SqlitePool,
}

impl SqliteTaxSchemeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxSchemeRepo for SqliteTaxSchemeRepo {
    async fn create(
        &self,
        scheme: TaxScheme,
        stamp: &Stamp,
    ) -> Result<Record<TaxScheme>, RepoError> {
        let id = ExternalId::new();
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("acquire", e))?;
        let key = insert_tax_scheme(&mut *conn, id, &scheme, stamp).await?;

        Ok(Record {
            key,
            id,
            status: RecordStatus::Active,
            audit: Audit::created(stamp),
            fields: scheme,
        })
    }

    async fn get(&self, id: ExternalId) -> Result<Option<Record<TaxScheme>>, RepoError> {
        fetch_active(&self.pool, TAX_SCHEMES, id)
            .await?
            .map(|row| row_to_tax_scheme(&row))
            .transpose()
    }

    async fn get_by_key(&self, key: RowId) -> Result<Option<Record<TaxScheme>>, RepoError> {
        fetch_by_key(&self.pool, TAX_SCHEMES, key)
            .await?
            .map(|row| row_to_tax_scheme(&row))
            .transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Record<TaxScheme>>, RepoError> {
        let rows = fetch_page(&self.pool, TAX_SCHEMES, page).await?;
        page_of(&rows, row_to_tax_scheme)
    }

    async fn update(
        &self,
        id: ExternalId,
        update: &TaxSchemeUpdate,
        stamp: &Stamp,
    ) -> Result<(), RepoError> {
        let columns = [
            ("name", update.name.as_deref()),
            ("tax_type_code", update.tax_type_code.as_deref()),
            ("currency_code", update.currency_code.as_deref()),
        ];
        if !update_columns(&self.pool, TAX_SCHEMES, &columns, id, stamp).await? {
            return Err(RepoError::not_found("tax_scheme", id));
        }
        Ok(())
    }

    async fn deactivate(&self, id: ExternalId, stamp: &Stamp) -> Result<(), RepoError> {
        deactivate_row(&self.pool, TAX_SCHEMES, id, stamp)
            .await?
            .ok_or_else(|| RepoError::not_found("tax_scheme", id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::test_support::{stamp, TestDb};

    #[tokio::test]
    async fn standalone_scheme_lifecycle() {
        let db = TestDb::new().await;
        let repo = SqliteTaxSchemeRepo::new(db.pool.clone());

        let created = repo
            .create(TaxScheme::new("VAT").with_name("Value added tax"), &stamp())
            .await
            .expect("create");
        let fetched = repo.get(created.id).await.expect("get").expect("found");
        assert_eq!(fetched, created);

        let update = TaxSchemeUpdate {
            currency_code: Some("EUR".into()),
            ..TaxSchemeUpdate::default()
        };
        repo.update(created.id, &update, &stamp()).await.expect("update");
        let fetched = repo.get(created.id).await.expect("get").expect("found");
        assert_eq!(fetched.fields.currency_code.as_deref(), Some("EUR"));
        assert_eq!(fetched.fields.name.as_deref(), Some("Value added tax"));

        repo.deactivate(created.id, &stamp()).await.expect("deactivate");
        assert!(repo.get(created.id).await.expect("get").is_none());
        let page = repo.list(PageRequest::first(10)).await.expect("list");
        assert!(page.items.is_empty());
        assert!(page.is_exhausted());

        let missing = repo.update(created.id, &update, &stamp()).await;
        assert!(matches!(missing, Err(RepoError::NotFound { .. })));
    }
}
