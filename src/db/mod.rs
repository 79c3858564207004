//! Database module for Valley.
//!
//! This module provides database connectivity and migration management.
//! SQLite is the default backend; the `postgres` feature switches the
//! pool, dialect constants, and connection handling to PostgreSQL.

mod lifecycle;
mod repository;
mod schema;
mod user;

pub use lifecycle::Lifecycle;
pub use repository::UserRepository;
pub use schema::MIGRATIONS;
pub use user::{NewUser, User};

#[cfg(feature = "sqlite")]
use std::path::Path;
#[cfg(feature = "sqlite")]
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::ValleyError;
use crate::Result;

/// Active database backend.
#[cfg(feature = "sqlite")]
pub type Db = sqlx::Sqlite;
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
pub type Db = sqlx::Postgres;

/// Connection pool for the active backend.
pub type DbPool = sqlx::Pool<Db>;

/// SQL literal for boolean TRUE.
#[cfg(feature = "sqlite")]
pub const SQL_TRUE: &str = "1";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
pub const SQL_TRUE: &str = "TRUE";

/// SQL literal for boolean FALSE.
#[cfg(feature = "sqlite")]
pub const SQL_FALSE: &str = "0";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
pub const SQL_FALSE: &str = "FALSE";

#[cfg(feature = "sqlite")]
const TABLE_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = $1)";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const TABLE_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)";

/// Database wrapper for managing the connection pool and migrations.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open a database at the specified path.
    ///
    /// If the database file doesn't exist, it will be created.
    /// Migrations are automatically applied.
    #[cfg(feature = "sqlite")]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            // WAL mode for better concurrent read performance
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Open a database using a PostgreSQL connection URL.
    ///
    /// Migrations are automatically applied.
    #[cfg(all(feature = "postgres", not(feature = "sqlite")))]
    pub async fn open(url: &str) -> Result<Self> {
        use sqlx::postgres::PgPoolOptions;

        info!("Opening database connection");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    #[cfg(feature = "sqlite")]
    pub async fn open_in_memory() -> Result<Self> {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        debug!("Opening in-memory database");

        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        // A single never-reclaimed connection: each SQLite connection gets
        // its own private in-memory database, so the pool must not open a
        // second one or drop the first.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Begin a new transaction.
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, Db>> {
        self.pool
            .begin()
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        if !self.table_exists("schema_version").await? {
            return Ok(0);
        }

        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(version)
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(TABLE_EXISTS_SQL)
            .bind(table_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;
        Ok(exists)
    }

    /// Apply pending migrations.
    async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;
        let migrations = MIGRATIONS;

        if current_version as usize >= migrations.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            migrations.len()
        );

        // Ensure schema_version table exists
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        // Apply each pending migration in a transaction
        for (i, migration) in migrations.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.begin().await?;

            sqlx::raw_sql(migration)
                .execute(&mut *tx)
                .await
                .map_err(|e| ValleyError::Storage(e.to_string()))?;

            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(version)
                .execute(&mut *tx)
                .await
                .map_err(|e| ValleyError::Storage(e.to_string()))?;

            tx.commit()
                .await
                .map_err(|e| ValleyError::Storage(e.to_string()))?;
            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            migrations.len()
        );
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

/// Parse a stored datetime string to `DateTime<Utc>`.
///
/// Accepts RFC3339 or the SQLite default format (`YYYY-MM-DD HH:MM:SS`).
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.schema_version().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::open_in_memory().await.unwrap();

        let version = db.schema_version().await.unwrap();
        assert_eq!(version as usize, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_all_tables_exist() {
        let db = Database::open_in_memory().await.unwrap();

        for table in ["users", "clones", "boards", "posts", "replies", "subscriptions"] {
            assert!(
                db.table_exists(table).await.unwrap(),
                "table {} should exist",
                table
            );
        }
    }

    #[tokio::test]
    async fn test_missing_table_reported_absent() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(!db.table_exists("no_such_table").await.unwrap());
    }

    #[tokio::test]
    async fn test_open_creates_file_and_is_reopenable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valley.db");

        {
            let db = Database::open(&path).await.unwrap();
            assert_eq!(db.schema_version().await.unwrap() as usize, MIGRATIONS.len());
        }
        assert!(path.exists());

        // Reopening must be a no-op migration-wise
        let db = Database::open(&path).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap() as usize, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_begin_transaction() {
        let db = Database::open_in_memory().await.unwrap();
        let tx = db.begin().await.unwrap();
        tx.rollback().await.unwrap();
    }

    #[test]
    fn test_parse_datetime_sqlite_format() {
        let dt = parse_datetime("2024-05-01 12:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        assert!(parse_datetime("2024-05-01T12:30:00Z").is_some());
        assert!(parse_datetime("not a date").is_none());
    }
}
