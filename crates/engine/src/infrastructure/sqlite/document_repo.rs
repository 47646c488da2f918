//! Composite document persistence: one transaction per create covering the
//! header, its sub-resources and its lines.
//!
//! A create runs in this order:
//! 1. external ids for the header and every line are minted up front;
//! 2. the transaction opens;
//! 3. each header attachment is inserted and its key recorded under its slot;
//! 4. the header is linked against those keys and inserted;
//! 5. each line's attachments are inserted, then the line itself, linked
//!    against its own keys and carrying the header's key as its foreign key;
//! 6. the transaction commits, and only then is the result assembled.
//!
//! Any failure returns early and drops the transaction, which rolls it back.

use async_trait::async_trait;
use docstore_domain::common::format_timestamp;
use docstore_domain::{
    Audit, Document, DocumentKind, DocumentOf, ExternalId, LineRecord, Linkable, NewDocumentOf,
    Page, PageRequest, Record, RecordStatus, RowId, Stamp,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqliteConnection, SqlitePool};

use super::helpers::{
    deactivate_row, fetch_active, fetch_by_key, fetch_page, page_of, update_columns, RowExt,
};
use super::sub_resource_repo::insert_attachments;
use crate::infrastructure::ports::{DocumentRepo, RepoError};

/// The table holding a kind's lines and the column pointing at the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTable {
    pub table: &'static str,
    pub header_column: &'static str,
}

/// Column mapping of one document kind.
#[async_trait]
pub trait DocumentSchema: Send + Sync + 'static {
    type Kind: DocumentKind;

    const HEADER_TABLE: &'static str;
    /// `None` for header-only kinds.
    const LINES: Option<LineTable>;

    async fn insert_header(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header: &<Self::Kind as DocumentKind>::Header,
    ) -> Result<RowId, RepoError>;

    async fn insert_line(
        &self,
        conn: &mut SqliteConnection,
        id: ExternalId,
        stamp: &Stamp,
        header_key: RowId,
        line: &<Self::Kind as DocumentKind>::Line,
    ) -> Result<RowId, RepoError>;

    fn header_fields(
        &self,
        row: &SqliteRow,
    ) -> Result<<Self::Kind as DocumentKind>::Header, RepoError>;

    fn line_fields(&self, row: &SqliteRow)
        -> Result<<Self::Kind as DocumentKind>::Line, RepoError>;

    /// Header columns a narrow update may change, paired with their new values.
    fn update_columns<'u>(
        &self,
        update: &'u <Self::Kind as DocumentKind>::Update,
    ) -> Vec<(&'static str, Option<&'u str>)>;
}

// =============================================================================
// Coordinator
// =============================================================================

struct PreparedLine<L> {
    id: ExternalId,
    fields: L,
}

/// A create payload with every external id already assigned.
struct PreparedDocument<K: DocumentKind> {
    header_id: ExternalId,
    header: K::NewHeader,
    lines: Vec<PreparedLine<K::NewLine>>,
}

impl<K: DocumentKind> PreparedDocument<K> {
    fn mint(doc: NewDocumentOf<K>) -> Self {
        Self {
            header_id: ExternalId::new(),
            header: doc.header,
            lines: doc
                .lines
                .into_iter()
                .map(|fields| PreparedLine {
                    id: ExternalId::new(),
                    fields,
                })
                .collect(),
        }
    }
}

/// Everything the write produced that the result needs.
struct WriteReceipt<H, L> {
    header: H,
    header_key: RowId,
    lines: Vec<(RowId, L)>,
}

/// Builds the committed document from captured keys; called after commit.
fn assemble<K: DocumentKind>(
    prepared: PreparedDocument<K>,
    receipt: WriteReceipt<K::Header, K::Line>,
    stamp: &Stamp,
) -> DocumentOf<K> {
    let audit = Audit::created(stamp);
    let header_key = receipt.header_key;
    let lines = prepared
        .lines
        .into_iter()
        .zip(receipt.lines)
        .map(|(line, (key, fields))| LineRecord {
            header_key,
            record: Record {
                key,
                id: line.id,
                status: RecordStatus::Active,
                audit: audit.clone(),
                fields,
            },
        })
        .collect();

    Document {
        header: Record {
            key: header_key,
            id: prepared.header_id,
            status: RecordStatus::Active,
            audit,
            fields: receipt.header,
        },
        lines,
    }
}

/// SQLite storage of one document kind, parameterized by its column mapping.
pub struct SqliteDocumentRepo<S> {
    pool: SqlitePool,
    schema: S,
}

impl<S: DocumentSchema> SqliteDocumentRepo<S> {
    pub fn new(pool: SqlitePool, schema: S) -> Self {
        Self { pool, schema }
    }

    async fn write(
        &self,
        prepared: &PreparedDocument<S::Kind>,
        stamp: &Stamp,
    ) -> Result<
        WriteReceipt<<S::Kind as DocumentKind>::Header, <S::Kind as DocumentKind>::Line>,
        RepoError,
    > {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("begin", e))?;

        let attachments = prepared.header.attachments();
        let keys = insert_attachments(&mut *tx, &attachments, stamp).await?;

        let header = prepared.header.clone().link(&keys);
        let header_key = self
            .schema
            .insert_header(&mut *tx, prepared.header_id, stamp, &header)
            .await?;

        let mut lines = Vec::with_capacity(prepared.lines.len());
        for line in &prepared.lines {
            let line_keys =
                insert_attachments(&mut *tx, &line.fields.attachments(), stamp).await?;
            let fields = line.fields.clone().link(&line_keys);
            let key = self
                .schema
                .insert_line(&mut *tx, line.id, stamp, header_key, &fields)
                .await?;
            lines.push((key, fields));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))?;

        Ok(WriteReceipt {
            header,
            header_key,
            lines,
        })
    }

    fn header_record(
        &self,
        row: &SqliteRow,
    ) -> Result<Record<<S::Kind as DocumentKind>::Header>, RepoError> {
        row.record(self.schema.header_fields(row)?)
    }

    async fn lines_of(
        &self,
        header_key: RowId,
        active_only: bool,
    ) -> Result<Vec<LineRecord<<S::Kind as DocumentKind>::Line>>, RepoError> {
        let Some(lines) = S::LINES else {
            return Ok(Vec::new());
        };

        let status_filter = if active_only { " AND status = 'active'" } else { "" };
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?{status_filter} ORDER BY id",
            lines.table, lines.header_column
        );
        let rows = sqlx::query(&sql)
            .bind(header_key.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("fetch_lines", e))?;

        rows.iter()
            .map(|row| -> Result<_, RepoError> {
                Ok(LineRecord {
                    header_key: row.key_column(lines.header_column)?,
                    record: row.record(self.schema.line_fields(row)?)?,
                })
            })
            .collect()
    }

    async fn document_from(
        &self,
        row: Option<SqliteRow>,
        active_only: bool,
    ) -> Result<Option<DocumentOf<S::Kind>>, RepoError> {
        let Some(row) = row else {
            return Ok(None);
        };
        let header = self.header_record(&row)?;
        let lines = self.lines_of(header.key, active_only).await?;
        Ok(Some(Document { header, lines }))
    }
}

#[async_trait]
impl<S: DocumentSchema> DocumentRepo<S::Kind> for SqliteDocumentRepo<S> {
    async fn create(
        &self,
        doc: NewDocumentOf<S::Kind>,
        stamp: &Stamp,
    ) -> Result<DocumentOf<S::Kind>, RepoError> {
        let prepared = PreparedDocument::<S::Kind>::mint(doc);
        let receipt = self.write(&prepared, stamp).await?;

        let kind = <S::Kind as DocumentKind>::NAME;
        tracing::debug!(
            kind,
            key = %receipt.header_key,
            id = %prepared.header_id,
            lines = receipt.lines.len(),
            "Committed composite document"
        );
        Ok(assemble(prepared, receipt, stamp))
    }

    async fn get(&self, id: ExternalId) -> Result<Option<DocumentOf<S::Kind>>, RepoError> {
        let row = fetch_active(&self.pool, S::HEADER_TABLE, id).await?;
        self.document_from(row, true).await
    }

    async fn get_by_key(&self, key: RowId) -> Result<Option<DocumentOf<S::Kind>>, RepoError> {
        let row = fetch_by_key(&self.pool, S::HEADER_TABLE, key).await?;
        self.document_from(row, false).await
    }

    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<Page<Record<<S::Kind as DocumentKind>::Header>>, RepoError> {
        let rows = fetch_page(&self.pool, S::HEADER_TABLE, page).await?;
        page_of(&rows, |row| self.header_record(row))
    }

    async fn update(
        &self,
        id: ExternalId,
        update: &<S::Kind as DocumentKind>::Update,
        stamp: &Stamp,
    ) -> Result<(), RepoError> {
        let columns = self.schema.update_columns(update);
        let updated = update_columns(&self.pool, S::HEADER_TABLE, &columns, id, stamp).await?;
        if !updated {
            return Err(RepoError::not_found(<S::Kind as DocumentKind>::NAME, id));
        }
        Ok(())
    }

    async fn deactivate(&self, id: ExternalId, stamp: &Stamp) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("begin", e))?;

        let header_key = deactivate_row(&mut *tx, S::HEADER_TABLE, id, stamp)
            .await?
            .ok_or_else(|| RepoError::not_found(<S::Kind as DocumentKind>::NAME, id))?;

        if let Some(lines) = S::LINES {
            let sql = format!(
                "UPDATE {} SET status = 'inactive', updated_by = ?, updated_at = ? \
                 WHERE {} = ? AND status = 'active'",
                lines.table, lines.header_column
            );
            sqlx::query(&sql)
                .bind(stamp.actor.clone())
                .bind(format_timestamp(stamp.at))
                .bind(header_key.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("deactivate_lines", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::documents::PurchaseOrderSchema;
    use crate::infrastructure::sqlite::test_support::{stamp, TestDb};
    use docstore_domain::{
        Address, NewDocument, NewPurchaseOrder, PageCursor, PurchaseOrderKind, PurchaseOrderLine,
        PurchaseOrderUpdate, EXHAUSTED_CURSOR,
    };

    fn order(number: &str, lines: usize) -> NewDocumentOf<PurchaseOrderKind> {
        NewDocument::new(
            NewPurchaseOrder::new(number, "2024-04-01")
                .with_delivery_address(Address::new("Rotterdam").with_country_code("NL")),
            (1..=lines)
                .map(|n| PurchaseOrderLine::new(n.to_string(), format!("Item {n}"), "10"))
                .collect(),
        )
    }

    fn repo(db: &TestDb) -> SqliteDocumentRepo<PurchaseOrderSchema> {
        SqliteDocumentRepo::new(db.pool.clone(), PurchaseOrderSchema)
    }

    fn keys_of(page: &Page<Record<docstore_domain::PurchaseOrder>>) -> Vec<i64> {
        page.items.iter().map(|r| r.key.get()).collect()
    }

    #[tokio::test]
    async fn every_line_points_at_its_header() {
        let db = TestDb::new().await;
        let created = repo(&db).create(order("PO-1", 3), &stamp()).await.expect("create");

        assert_eq!(created.lines.len(), 3);
        for line in &created.lines {
            assert_eq!(line.header_key, created.header.key);
        }

        let stored: Vec<i64> = sqlx::query_scalar(
            "SELECT purchase_order_id FROM purchase_order_lines ORDER BY id",
        )
        .fetch_all(&db.pool)
        .await
        .expect("query");
        assert_eq!(stored, vec![created.header.key.get(); 3]);
        assert!(created.header.fields.delivery_address_key.is_some());
    }

    #[tokio::test]
    async fn external_ids_are_stored_as_sixteen_bytes() {
        let db = TestDb::new().await;
        let created = repo(&db).create(order("PO-1", 1), &stamp()).await.expect("create");

        let bytes: Vec<u8> = sqlx::query_scalar("SELECT uuid FROM purchase_orders WHERE id = ?")
            .bind(created.header.key.get())
            .fetch_one(&db.pool)
            .await
            .expect("query");
        assert_eq!(bytes, created.header.id.to_bytes().to_vec());
        assert_ne!(created.header.id, created.lines[0].record.id);

        let fetched = repo(&db)
            .get(created.header.id)
            .await
            .expect("get")
            .expect("found");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn failing_second_line_rolls_back_everything() {
        let db = TestDb::new().await;
        db.fail_inserts_when("purchase_order_lines", "NEW.line_number = '2'")
            .await;

        let result = repo(&db).create(order("PO-1", 2), &stamp()).await;

        assert!(matches!(result, Err(RepoError::Database { .. })));
        assert_eq!(db.count("addresses").await, 0);
        assert_eq!(db.count("purchase_orders").await, 0);
        assert_eq!(db.count("purchase_order_lines").await, 0);
    }

    #[tokio::test]
    async fn failing_sub_resource_writes_nothing() {
        let db = TestDb::new().await;
        db.fail_inserts_when("addresses", "1").await;

        let result = repo(&db).create(order("PO-1", 2), &stamp()).await;

        assert!(result.is_err());
        assert_eq!(db.count("purchase_orders").await, 0);
        assert_eq!(db.count("purchase_order_lines").await, 0);
    }

    #[tokio::test]
    async fn listing_walks_keys_downwards() {
        let db = TestDb::new().await;
        let repo = repo(&db);
        for n in 1..=5 {
            repo.create(order(&format!("PO-{n}"), 0), &stamp())
                .await
                .expect("create");
        }

        let first = repo.list(PageRequest::first(2)).await.expect("page 1");
        assert_eq!(keys_of(&first), vec![5, 4]);
        let cursor = PageCursor::decode(&first.next_cursor).expect("cursor");
        assert_eq!(cursor.boundary(), 3);

        let second = repo
            .list(PageRequest::from_cursor(2, cursor))
            .await
            .expect("page 2");
        assert_eq!(keys_of(&second), vec![3, 2]);

        let third = repo
            .list(PageRequest::parse(Some("2"), Some(&second.next_cursor)).expect("request"))
            .await
            .expect("page 3");
        assert_eq!(keys_of(&third), vec![1]);

        let fourth = repo
            .list(PageRequest::parse(Some("2"), Some(&third.next_cursor)).expect("request"))
            .await
            .expect("page 4");
        assert!(fourth.items.is_empty());
        assert_eq!(fourth.next_cursor, EXHAUSTED_CURSOR);

        let exhausted = repo
            .list(PageRequest::parse(Some("2"), Some(EXHAUSTED_CURSOR)).expect("request"))
            .await
            .expect("exhausted");
        assert!(exhausted.items.is_empty());
    }

    #[tokio::test]
    async fn inactive_headers_drop_out_of_listings() {
        let db = TestDb::new().await;
        let repo = repo(&db);
        let mut ids = Vec::new();
        for n in 1..=3 {
            let doc = repo
                .create(order(&format!("PO-{n}"), 1), &stamp())
                .await
                .expect("create");
            ids.push(doc.header.id);
        }

        repo.deactivate(ids[1], &stamp()).await.expect("deactivate");

        let page = repo.list(PageRequest::first(10)).await.expect("list");
        assert_eq!(keys_of(&page), vec![3, 1]);
        assert!(repo.get(ids[1]).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let db = TestDb::new().await;
        let update = PurchaseOrderUpdate {
            note: Some("expedite".into()),
            ..PurchaseOrderUpdate::default()
        };

        let result = repo(&db).update(ExternalId::new(), &update, &stamp()).await;

        assert!(matches!(result, Err(RepoError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_stamps_the_updater() {
        let db = TestDb::new().await;
        let repo = repo(&db);
        let created = repo.create(order("PO-1", 0), &stamp()).await.expect("create");
        let later = Stamp::new("u-editor", stamp().at + chrono::Duration::hours(1));

        let update = PurchaseOrderUpdate {
            note: Some("expedite".into()),
            ..PurchaseOrderUpdate::default()
        };
        repo.update(created.header.id, &update, &later)
            .await
            .expect("update");

        let stored = repo
            .get(created.header.id)
            .await
            .expect("get")
            .expect("found");
        assert_eq!(stored.header.fields.note.as_deref(), Some("expedite"));
        assert_eq!(stored.header.audit.created_by, "u-test");
        assert_eq!(stored.header.audit.updated_by, "u-editor");
        assert_eq!(stored.header.audit.updated_at, later.at);
        assert_eq!(stored.header.id, created.header.id);
        assert_eq!(stored.header.key, created.header.key);
    }

    #[tokio::test]
    async fn identifiers_survive_update_and_delete() {
        let db = TestDb::new().await;
        let repo = repo(&db);
        let created = repo.create(order("PO-1", 2), &stamp()).await.expect("create");

        let update = PurchaseOrderUpdate {
            currency_code: Some("EUR".into()),
            ..PurchaseOrderUpdate::default()
        };
        repo.update(created.header.id, &update, &stamp())
            .await
            .expect("update");
        repo.deactivate(created.header.id, &stamp())
            .await
            .expect("deactivate");

        let stored = repo
            .get_by_key(created.header.key)
            .await
            .expect("get")
            .expect("found");
        assert_eq!(stored.header.id, created.header.id);
        assert_eq!(stored.header.key, created.header.key);
        assert_eq!(stored.header.status, RecordStatus::Inactive);

        let line_ids: Vec<_> = stored.lines.iter().map(|l| (l.record.key, l.record.id)).collect();
        let created_ids: Vec<_> = created
            .lines
            .iter()
            .map(|l| (l.record.key, l.record.id))
            .collect();
        assert_eq!(line_ids, created_ids);
        assert!(stored
            .lines
            .iter()
            .all(|l| l.record.status == RecordStatus::Inactive));
    }

    #[test]
    fn assembled_lines_share_the_header_key() {
        let prepared = PreparedDocument::<PurchaseOrderKind>::mint(order("PO-1", 2));
        let line_ids: Vec<_> = prepared.lines.iter().map(|l| l.id).collect();
        let stored_lines = prepared
            .lines
            .iter()
            .zip([RowId::new(7), RowId::new(8)])
            .map(|(line, key)| (key, line.fields.clone()))
            .collect();
        let header = prepared
            .header
            .clone()
            .link(&docstore_domain::AttachmentKeys::new());
        let receipt = WriteReceipt {
            header,
            header_key: RowId::new(40),
            lines: stored_lines,
        };

        let doc = assemble(prepared, receipt, &stamp());

        assert_eq!(doc.header.key, RowId::new(40));
        assert_eq!(doc.lines[0].record.key, RowId::new(7));
        assert_eq!(doc.lines[1].record.id, line_ids[1]);
        assert!(doc.lines.iter().all(|l| l.header_key == RowId::new(40)));
    }
}
