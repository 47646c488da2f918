//! Temp-file databases and helpers for SQLite tests.

use chrono::{TimeZone, Utc};
use docstore_domain::Stamp;
use sqlx::SqlitePool;
use tempfile::TempDir;

use super::{connect, ensure_schema};
use crate::infrastructure::config::DatabaseConfig;

/// A fresh database file in its own temp directory. Pool connections share
/// the file, unlike `sqlite::memory:` where each connection is separate.
pub(crate) struct TestDb {
    _dir: TempDir,
    pub pool: SqlitePool,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("docstore.db");
        let config = DatabaseConfig::new(path.to_string_lossy());
        let pool = connect(&config).await.expect("connect");
        ensure_schema(&pool).await.expect("schema");
        Self { _dir: dir, pool }
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("count")
    }

    /// Makes inserts into `table` abort when `condition` (over `NEW`) holds.
    pub async fn fail_inserts_when(&self, table: &str, condition: &str) {
        let sql = format!(
            "CREATE TRIGGER fail_{table}_insert BEFORE INSERT ON {table} \
             WHEN {condition} BEGIN SELECT RAISE(ABORT, 'injected failure'); END"
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .expect("create trigger");
    }
}

pub(crate) fn stamp() -> Stamp {
    Stamp::new(
        "u-test",
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).single().expect("valid time"),
    )
}
