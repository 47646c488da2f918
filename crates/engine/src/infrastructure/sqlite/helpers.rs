//! Row conversion and binding helpers shared by the SQLite repositories.

use chrono::{DateTime, Utc};
use docstore_domain::common::{format_timestamp, parse_timestamp};
use docstore_domain::{
    Audit, ExternalId, Page, PageRequest, PageStart, Record, RecordStatus, RowId, Stamp,
};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Executor, Row, Sqlite, SqliteConnection};

use crate::infrastructure::ports::RepoError;

pub(crate) type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

// =============================================================================
// Binding
// =============================================================================

/// Binds the trailing `uuid, status, created_by, updated_by, created_at,
/// updated_at` values of an insert.
pub(crate) fn bind_new_row<'q>(query: SqliteQuery<'q>, id: ExternalId, stamp: &Stamp) -> SqliteQuery<'q> {
    let at = format_timestamp(stamp.at);
    query
        .bind(id.to_bytes().to_vec())
        .bind(RecordStatus::Active.as_str())
        .bind(stamp.actor.clone())
        .bind(stamp.actor.clone())
        .bind(at.clone())
        .bind(at)
}

/// Column list matching [`bind_new_row`].
pub(crate) const NEW_ROW_COLUMNS: &str =
    "uuid, status, created_by, updated_by, created_at, updated_at";
pub(crate) const NEW_ROW_VALUES: &str = "?, ?, ?, ?, ?, ?";

/// Run an insert whose last six placeholders are the new-row columns and
/// return the generated surrogate key.
pub(crate) async fn insert_row(
    conn: &mut SqliteConnection,
    query: SqliteQuery<'_>,
    id: ExternalId,
    stamp: &Stamp,
    operation: &'static str,
) -> Result<RowId, RepoError> {
    let result = bind_new_row(query, id, stamp)
        .execute(conn)
        .await
        .map_err(|e| RepoError::database(operation, e))?;
    Ok(RowId::new(result.last_insert_rowid()))
}

// =============================================================================
// Row Extension Trait
// =============================================================================

/// Typed column access with decode failures mapped to [`RepoError`].
pub(crate) trait RowExt {
    fn string(&self, column: &'static str) -> Result<String, RepoError>;
    fn optional_string(&self, column: &'static str) -> Result<Option<String>, RepoError>;
    fn integer(&self, column: &'static str) -> Result<i64, RepoError>;
    fn flag(&self, column: &'static str) -> Result<bool, RepoError>;
    fn timestamp(&self, column: &'static str) -> Result<DateTime<Utc>, RepoError>;

    fn key_column(&self, column: &'static str) -> Result<RowId, RepoError> {
        self.integer(column).map(RowId::new)
    }

    /// A nullable foreign key.
    fn optional_key(&self, column: &'static str) -> Result<Option<RowId>, RepoError>;

    fn external_id(&self) -> Result<ExternalId, RepoError>;

    fn status(&self) -> Result<RecordStatus, RepoError> {
        self.string("status")?
            .parse()
            .map_err(|e| RepoError::decode("status", e))
    }

    fn audit(&self) -> Result<Audit, RepoError> {
        Ok(Audit {
            created_by: self.string("created_by")?,
            updated_by: self.string("updated_by")?,
            created_at: self.timestamp("created_at")?,
            updated_at: self.timestamp("updated_at")?,
        })
    }

    /// Wraps kind-specific fields with the row's key, id, status and audit.
    fn record<T>(&self, fields: T) -> Result<Record<T>, RepoError> {
        Ok(Record {
            key: self.key_column("id")?,
            id: self.external_id()?,
            status: self.status()?,
            audit: self.audit()?,
            fields,
        })
    }
}

impl RowExt for SqliteRow {
    fn string(&self, column: &'static str) -> Result<String, RepoError> {
        self.try_get(column)
            .map_err(|e| RepoError::decode(column, e))
    }

    fn optional_string(&self, column: &'static str) -> Result<Option<String>, RepoError> {
        self.try_get(column)
            .map_err(|e| RepoError::decode(column, e))
    }

    fn integer(&self, column: &'static str) -> Result<i64, RepoError> {
        self.try_get(column)
            .map_err(|e| RepoError::decode(column, e))
    }

    fn flag(&self, column: &'static str) -> Result<bool, RepoError> {
        self.try_get(column)
            .map_err(|e| RepoError::decode(column, e))
    }

    fn timestamp(&self, column: &'static str) -> Result<DateTime<Utc>, RepoError> {
        let raw = self.string(column)?;
        parse_timestamp(&raw).map_err(|e| RepoError::decode(column, e))
    }

    fn optional_key(&self, column: &'static str) -> Result<Option<RowId>, RepoError> {
        let value: Option<i64> = self
            .try_get(column)
            .map_err(|e| RepoError::decode(column, e))?;
        Ok(value.map(RowId::new))
    }

    fn external_id(&self) -> Result<ExternalId, RepoError> {
        let bytes: Vec<u8> = self
            .try_get("uuid")
            .map_err(|e| RepoError::decode("uuid", e))?;
        ExternalId::from_bytes(&bytes).map_err(|e| RepoError::decode("uuid", e))
    }
}

// =============================================================================
// Table Operations
// =============================================================================

/// Fetch an active row by external id.
pub(crate) async fn fetch_active<'c, E>(
    executor: E,
    table: &'static str,
    id: ExternalId,
) -> Result<Option<SqliteRow>, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!("SELECT * FROM {table} WHERE uuid = ? AND status = 'active'");
    sqlx::query(&sql)
        .bind(id.to_bytes().to_vec())
        .fetch_optional(executor)
        .await
        .map_err(|e| RepoError::database("fetch_active", e))
}

/// Fetch a row by surrogate key, whatever its status.
pub(crate) async fn fetch_by_key<'c, E>(
    executor: E,
    table: &'static str,
    key: RowId,
) -> Result<Option<SqliteRow>, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!("SELECT * FROM {table} WHERE id = ?");
    sqlx::query(&sql)
        .bind(key.get())
        .fetch_optional(executor)
        .await
        .map_err(|e| RepoError::database("fetch_by_key", e))
}

/// One page of active rows in descending key order.
pub(crate) async fn fetch_page<'c, E>(
    executor: E,
    table: &'static str,
    page: PageRequest,
) -> Result<Vec<SqliteRow>, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let (sql, boundary) = match page.start {
        PageStart::Exhausted => return Ok(Vec::new()),
        PageStart::Top => (
            format!("SELECT * FROM {table} WHERE status = 'active' ORDER BY id DESC LIMIT ?"),
            None,
        ),
        PageStart::From(cursor) => (
            format!(
                "SELECT * FROM {table} WHERE status = 'active' AND id <= ? ORDER BY id DESC LIMIT ?"
            ),
            Some(cursor.boundary()),
        ),
    };

    let mut query = sqlx::query(&sql);
    if let Some(boundary) = boundary {
        query = query.bind(boundary);
    }
    query
        .bind(i64::from(page.limit))
        .fetch_all(executor)
        .await
        .map_err(|e| RepoError::database("fetch_page", e))
}

/// Decode a page of rows and derive the next cursor from the last key.
pub(crate) fn page_of<T>(
    rows: &[SqliteRow],
    decode: impl Fn(&SqliteRow) -> Result<Record<T>, RepoError>,
) -> Result<Page<Record<T>>, RepoError> {
    let items = rows.iter().map(decode).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::from_descending(items, |record| record.key))
}

/// Flip an active row to inactive. Returns the surrogate key, or `None` when
/// no active row has this id.
pub(crate) async fn deactivate_row<'c, E>(
    executor: E,
    table: &'static str,
    id: ExternalId,
    stamp: &Stamp,
) -> Result<Option<RowId>, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE {table} SET status = 'inactive', updated_by = ?, updated_at = ? \
         WHERE uuid = ? AND status = 'active' RETURNING id"
    );
    let row = sqlx::query(&sql)
        .bind(stamp.actor.clone())
        .bind(format_timestamp(stamp.at))
        .bind(id.to_bytes().to_vec())
        .fetch_optional(executor)
        .await
        .map_err(|e| RepoError::database("deactivate", e))?;

    row.map(|row| row.key_column("id")).transpose()
}

/// Narrow update of text columns on an active row. `None` leaves a column
/// as it is; the update stamp is always written. Returns `false` when no
/// active row has this id.
pub(crate) async fn update_columns<'c, E>(
    executor: E,
    table: &'static str,
    columns: &[(&'static str, Option<&str>)],
    id: ExternalId,
    stamp: &Stamp,
) -> Result<bool, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let assignments: String = columns
        .iter()
        .map(|(column, _)| format!("{column} = COALESCE(?, {column}), "))
        .collect();
    let sql = format!(
        "UPDATE {table} SET {assignments}updated_by = ?, updated_at = ? \
         WHERE uuid = ? AND status = 'active'"
    );

    let mut query = sqlx::query(&sql);
    for (_, value) in columns {
        query = query.bind(*value);
    }
    let result = query
        .bind(stamp.actor.clone())
        .bind(format_timestamp(stamp.at))
        .bind(id.to_bytes().to_vec())
        .execute(executor)
        .await
        .map_err(|e| RepoError::database("update", e))?;

    Ok(result.rows_affected() > 0)
}
