//! Party hierarchy storage.
//!
//! A child is created in one transaction that starts by bumping the parent's
//! counters with a single `UPDATE ... RETURNING`. That statement is the parent
//! lookup, takes SQLite's write lock before anything else is read, and makes
//! concurrent child creations under one parent queue up instead of losing
//! increments.

use async_trait::async_trait;
use docstore_domain::common::format_timestamp;
use docstore_domain::{
    Audit, CreatedChild, ExternalId, Linkable, NewParty, Page, PageRequest, ParentUpdate, Party,
    PartyDetails, PartyNode, PartyUpdate, Record, RecordStatus, RowId, Stamp, TreePosition,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqliteConnection, SqlitePool};

use super::helpers::{
    deactivate_row, fetch_active, fetch_by_key, fetch_page, insert_row, page_of, update_columns,
    RowExt, NEW_ROW_COLUMNS, NEW_ROW_VALUES,
};
use super::sub_resource_repo::insert_attachments;
use crate::infrastructure::ports::{PartyRepo, RepoError};

const PARTIES: &str = "parties";

pub struct SqlitePartyRepo {
    pool: SqlitePool,
}

impl SqlitePartyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_party(
    conn: &mut SqliteConnection,
    id: ExternalId,
    stamp: &Stamp,
    details: &PartyDetails,
    position: &TreePosition,
) -> Result<RowId, RepoError> {
    let sql = format!(
        "INSERT INTO {PARTIES} (name, registration_name, company_id, endpoint_id, \
         industry_classification, postal_address_id, party_tax_scheme_id, parent_id, level, \
         child_count, leaf, {NEW_ROW_COLUMNS}) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, {NEW_ROW_VALUES})"
    );
    let query = sqlx::query(&sql)
        .bind(details.name.as_str())
        .bind(details.registration_name.as_deref())
        .bind(details.company_id.as_deref())
        .bind(details.endpoint_id.as_deref())
        .bind(details.industry_classification.as_deref())
        .bind(details.postal_address_key.map(RowId::get))
        .bind(details.party_tax_scheme_key.map(RowId::get))
        .bind(position.parent_key.get())
        .bind(position.level)
        .bind(position.child_count)
        .bind(position.leaf);
    insert_row(conn, query, id, stamp, "insert_party").await
}

/// Increment the parent's child count and set its leaf flag. `None` when
/// the parent is missing or inactive.
async fn bump_parent(
    conn: &mut SqliteConnection,
    parent_key: RowId,
    stamp: &Stamp,
) -> Result<Option<ParentUpdate>, RepoError> {
    let row = sqlx::query(
        "UPDATE parties SET child_count = child_count + 1, leaf = 1, updated_by = ?, updated_at = ? \
         WHERE id = ? AND status = 'active' RETURNING level, child_count",
    )
    .bind(stamp.actor.as_str())
    .bind(format_timestamp(stamp.at))
    .bind(parent_key.get())
    .fetch_optional(conn)
    .await
    .map_err(|e| RepoError::database("bump_parent", e))?;

    row.map(|row| -> Result<_, RepoError> {
        Ok(ParentUpdate {
            parent_key,
            level: row.integer("level")?,
            child_count: row.integer("child_count")?,
        })
    })
    .transpose()
}

fn row_to_party(row: &SqliteRow) -> Result<Party, RepoError> {
    row.record(PartyNode {
        details: PartyDetails {
            name: row.string("name")?,
            registration_name: row.optional_string("registration_name")?,
            company_id: row.optional_string("company_id")?,
            endpoint_id: row.optional_string("endpoint_id")?,
            industry_classification: row.optional_string("industry_classification")?,
            postal_address_key: row.optional_key("postal_address_id")?,
            party_tax_scheme_key: row.optional_key("party_tax_scheme_id")?,
        },
        position: TreePosition {
            parent_key: row.key_column("parent_id")?,
            level: row.integer("level")?,
            child_count: row.integer("child_count")?,
            leaf: row.flag("leaf")?,
        },
    })
}

fn new_party(key: RowId, id: ExternalId, stamp: &Stamp, node: PartyNode) -> Party {
    Record {
        key,
        id,
        status: RecordStatus::Active,
        audit: Audit::created(stamp),
        fields: node,
    }
}

#[async_trait]
impl PartyRepo for SqlitePartyRepo {
    async fn create_root(&self, party: NewParty, stamp: &Stamp) -> Result<Party, RepoError> {
        let id = ExternalId::new();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("begin", e))?;

        let keys = insert_attachments(&mut *tx, &party.attachments(), stamp).await?;
        let details = party.link(&keys);
        let position = TreePosition::root();
        let key = insert_party(&mut *tx, id, stamp, &details, &position).await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))?;

        tracing::debug!(key = %key, id = %id, "Created root party");
        Ok(new_party(key, id, stamp, PartyNode { details, position }))
    }

    async fn create_child(
        &self,
        parent_key: RowId,
        party: NewParty,
        stamp: &Stamp,
    ) -> Result<CreatedChild, RepoError> {
        let child_id = ExternalId::new();
        let relationship_id = ExternalId::new();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("begin", e))?;

        let parent = bump_parent(&mut *tx, parent_key, stamp)
            .await?
            .ok_or_else(|| RepoError::not_found("party", parent_key))?;

        let keys = insert_attachments(&mut *tx, &party.attachments(), stamp).await?;
        let details = party.link(&keys);
        let position = TreePosition::child_of(parent_key, parent.level);
        let child_key = insert_party(&mut *tx, child_id, stamp, &details, &position).await?;

        let sql = format!(
            "INSERT INTO party_relationships (parent_id, child_id, {NEW_ROW_COLUMNS}) \
             VALUES (?, ?, {NEW_ROW_VALUES})"
        );
        let query = sqlx::query(&sql)
            .bind(parent_key.get())
            .bind(child_key.get());
        let relationship_key = insert_row(
            &mut *tx,
            query,
            relationship_id,
            stamp,
            "insert_party_relationship",
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))?;

        tracing::debug!(
            parent = %parent_key,
            child = %child_key,
            child_count = parent.child_count,
            "Created child party"
        );
        Ok(CreatedChild {
            child: new_party(child_key, child_id, stamp, PartyNode { details, position }),
            parent,
            relationship_key,
        })
    }

    async fn get(&self, id: ExternalId) -> Result<Option<Party>, RepoError> {
        fetch_active(&self.pool, PARTIES, id)
            .await?
            .map(|row| row_to_party(&row))
            .transpose()
    }

    async fn get_by_key(&self, key: RowId) -> Result<Option<Party>, RepoError> {
        fetch_by_key(&self.pool, PARTIES, key)
            .await?
            .map(|row| row_to_party(&row))
            .transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Party>, RepoError> {
        let rows = fetch_page(&self.pool, PARTIES, page).await?;
        page_of(&rows, row_to_party)
    }

    async fn list_children(&self, parent_key: RowId) -> Result<Vec<Party>, RepoError> {
        let rows = sqlx::query(
            "SELECT p.* FROM party_relationships r JOIN parties p ON p.id = r.child_id \
             WHERE r.parent_id = ? AND r.status = 'active' AND p.status = 'active' \
             ORDER BY p.id",
        )
        .bind(parent_key.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_children", e))?;

        rows.iter().map(row_to_party).collect()
    }

    async fn update(
        &self,
        id: ExternalId,
        update: &PartyUpdate,
        stamp: &Stamp,
    ) -> Result<(), RepoError> {
        let columns = [
            ("name", update.name.as_deref()),
            ("registration_name", update.registration_name.as_deref()),
            ("endpoint_id", update.endpoint_id.as_deref()),
        ];
        if !update_columns(&self.pool, PARTIES, &columns, id, stamp).await? {
            return Err(RepoError::not_found("party", id));
        }
        Ok(())
    }

    async fn deactivate(&self, id: ExternalId, stamp: &Stamp) -> Result<(), RepoError> {
        deactivate_row(&self.pool, PARTIES, id, stamp)
            .await?
            .ok_or_else(|| RepoError::not_found("party", id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::test_support::{stamp, TestDb};
    use docstore_domain::{Address, TaxScheme};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn root_is_level_zero_and_not_a_leaf() {
        let db = TestDb::new().await;
        let repo = SqlitePartyRepo::new(db.pool.clone());

        let root = repo
            .create_root(
                NewParty::new("Acme Holding")
                    .with_postal_address(Address::new("Utrecht"))
                    .with_tax_scheme(TaxScheme::new("VAT")),
                &stamp(),
            )
            .await
            .expect("create root");

        let position = root.fields.position;
        assert_eq!(position.parent_key, RowId::NONE);
        assert_eq!(position.level, 0);
        assert_eq!(position.child_count, 0);
        assert!(!position.leaf);
        assert!(root.fields.details.postal_address_key.is_some());
        assert!(root.fields.details.party_tax_scheme_key.is_some());

        let stored = repo.get(root.id).await.expect("get").expect("stored");
        assert_eq!(stored, root);
    }

    #[tokio::test]
    async fn children_bump_parent_counters() {
        let db = TestDb::new().await;
        let repo = SqlitePartyRepo::new(db.pool.clone());
        let root = repo
            .create_root(NewParty::new("Acme"), &stamp())
            .await
            .expect("root");

        let first = repo
            .create_child(root.key, NewParty::new("Acme Benelux"), &stamp())
            .await
            .expect("first child");
        assert_eq!(first.parent.child_count, 1);
        assert_eq!(first.child.fields.position.level, 1);
        assert_eq!(first.child.fields.position.parent_key, root.key);
        assert!(!first.child.fields.position.leaf);

        let parent = repo.get(root.id).await.expect("get").expect("parent");
        assert_eq!(parent.fields.position.child_count, 1);
        assert!(parent.fields.position.leaf);

        let second = repo
            .create_child(root.key, NewParty::new("Acme Nordics"), &stamp())
            .await
            .expect("second child");
        assert_eq!(second.parent.child_count, 2);

        let parent = repo.get(root.id).await.expect("get").expect("parent");
        assert_eq!(parent.fields.position.child_count, 2);
        assert!(parent.fields.position.leaf);

        let grandchild = repo
            .create_child(first.child.key, NewParty::new("Acme Rotterdam"), &stamp())
            .await
            .expect("grandchild");
        assert_eq!(grandchild.child.fields.position.level, 2);

        let children = repo.list_children(root.key).await.expect("children");
        let names: Vec<_> = children
            .iter()
            .map(|c| c.fields.details.name.as_str())
            .collect();
        assert_eq!(names, vec!["Acme Benelux", "Acme Nordics"]);
        assert_eq!(db.count("party_relationships").await, 3);
    }

    #[tokio::test]
    async fn missing_or_inactive_parent_writes_nothing() {
        let db = TestDb::new().await;
        let repo = SqlitePartyRepo::new(db.pool.clone());

        let missing = repo
            .create_child(RowId::new(41), NewParty::new("Orphan"), &stamp())
            .await;
        assert!(matches!(missing, Err(RepoError::NotFound { .. })));
        assert_eq!(db.count("parties").await, 0);

        let root = repo
            .create_root(NewParty::new("Acme"), &stamp())
            .await
            .expect("root");
        repo.deactivate(root.id, &stamp()).await.expect("deactivate");

        let inactive = repo
            .create_child(
                root.key,
                NewParty::new("Late").with_postal_address(Address::new("Gent")),
                &stamp(),
            )
            .await;
        assert!(matches!(inactive, Err(RepoError::NotFound { .. })));
        assert_eq!(db.count("parties").await, 1);
        assert_eq!(db.count("addresses").await, 0);

        let parent = repo
            .get_by_key(root.key)
            .await
            .expect("get")
            .expect("kept");
        assert_eq!(parent.fields.position.child_count, 0);
    }

    #[tokio::test]
    async fn failed_relationship_insert_keeps_parent_unchanged() {
        let db = TestDb::new().await;
        let repo = SqlitePartyRepo::new(db.pool.clone());
        let root = repo
            .create_root(NewParty::new("Acme"), &stamp())
            .await
            .expect("root");
        db.fail_inserts_when("party_relationships", "1").await;

        let result = repo
            .create_child(root.key, NewParty::new("Acme Benelux"), &stamp())
            .await;

        assert!(result.is_err());
        let parent = repo.get(root.id).await.expect("get").expect("parent");
        assert_eq!(parent.fields.position.child_count, 0);
        assert!(!parent.fields.position.leaf);
        assert_eq!(db.count("parties").await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_children_lose_no_increments() {
        let db = TestDb::new().await;
        let repo = Arc::new(SqlitePartyRepo::new(db.pool.clone()));
        let root = repo
            .create_root(NewParty::new("Acme"), &stamp())
            .await
            .expect("root");

        let tasks: Vec<_> = (0..8)
            .map(|n| {
                let repo = repo.clone();
                let parent_key = root.key;
                tokio::spawn(async move {
                    repo.create_child(parent_key, NewParty::new(format!("Branch {n}")), &stamp())
                        .await
                })
            })
            .collect();

        let counts: BTreeSet<i64> = futures_util::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.expect("join").expect("create child").parent.child_count)
            .collect();

        assert_eq!(counts, (1..=8).collect::<BTreeSet<i64>>());
        let parent = repo.get(root.id).await.expect("get").expect("parent");
        assert_eq!(parent.fields.position.child_count, 8);
        assert_eq!(repo.list_children(root.key).await.expect("children").len(), 8);
    }

    #[tokio::test]
    async fn inactive_children_are_not_listed() {
        let db = TestDb::new().await;
        let repo = SqlitePartyRepo::new(db.pool.clone());
        let root = repo
            .create_root(NewParty::new("Acme"), &stamp())
            .await
            .expect("root");
        let child = repo
            .create_child(root.key, NewParty::new("Acme Benelux"), &stamp())
            .await
            .expect("child");

        repo.deactivate(child.child.id, &stamp())
            .await
            .expect("deactivate");

        assert!(repo.list_children(root.key).await.expect("children").is_empty());
        let listed = repo.list(PageRequest::first(10)).await.expect("list");
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].key, root.key);
    }

    #[tokio::test]
    async fn rename_keeps_tree_position() {
        let db = TestDb::new().await;
        let repo = SqlitePartyRepo::new(db.pool.clone());
        let root = repo
            .create_root(NewParty::new("Acme"), &stamp())
            .await
            .expect("root");

        let update = PartyUpdate {
            name: Some("Acme Group".into()),
            ..PartyUpdate::default()
        };
        repo.update(root.id, &update, &stamp()).await.expect("update");

        let stored = repo.get(root.id).await.expect("get").expect("stored");
        assert_eq!(stored.fields.details.name, "Acme Group");
        assert_eq!(stored.fields.position, root.fields.position);
    }
}
