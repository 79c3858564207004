//! Clone repository for Valley.

use chrono::Utc;

use super::types::{Clone, NewClone};
use crate::db::{parse_datetime, DbPool};
use crate::{Result, ValleyError};

/// Database row for a clone.
#[derive(sqlx::FromRow)]
struct CloneRow {
    id: i64,
    user_id: i64,
    name: String,
    created_at: String,
}

impl From<CloneRow> for Clone {
    fn from(row: CloneRow) -> Self {
        Clone {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for clone lookups.
pub struct CloneRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CloneRepository<'a> {
    /// Create a new CloneRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new clone.
    ///
    /// Returns the created clone with the assigned ID.
    pub async fn create(&self, new_clone: &NewClone) -> Result<Clone> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO clones (user_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(new_clone.user_id)
        .bind(&new_clone.name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        self.get_by_id(id).await?.ok_or(ValleyError::CloneNotFound)
    }

    /// Get a clone by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Clone>> {
        let row = sqlx::query_as::<_, CloneRow>(
            "SELECT id, user_id, name, created_at FROM clones WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(Clone::from))
    }

    /// Check if a clone exists.
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clones WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;
        Ok(exists)
    }

    /// List all clones owned by a user, oldest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Clone>> {
        let rows = sqlx::query_as::<_, CloneRow>(
            "SELECT id, user_id, name, created_at FROM clones WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(rows.into_iter().map(Clone::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn create_user(db: &Database, nickname: &str) -> i64 {
        let repo = UserRepository::new(db.pool());
        repo.create(&NewUser::new(nickname)).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_clone() {
        let db = setup_db().await;
        let repo = CloneRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;

        let clone = repo.create(&NewClone::new(user_id, "alpha")).await.unwrap();

        assert_eq!(clone.user_id, user_id);
        assert_eq!(clone.name, "alpha");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = CloneRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;

        let created = repo.create(&NewClone::new(user_id, "alpha")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "alpha");

        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists() {
        let db = setup_db().await;
        let repo = CloneRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;

        let clone = repo.create(&NewClone::new(user_id, "alpha")).await.unwrap();

        assert!(repo.exists(clone.id).await.unwrap());
        assert!(!repo.exists(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_by_user() {
        let db = setup_db().await;
        let repo = CloneRepository::new(db.pool());
        let owner = create_user(&db, "miro").await;
        let other = create_user(&db, "sana").await;

        repo.create(&NewClone::new(owner, "alpha")).await.unwrap();
        repo.create(&NewClone::new(owner, "beta")).await.unwrap();
        repo.create(&NewClone::new(other, "gamma")).await.unwrap();

        let clones = repo.list_by_user(owner).await.unwrap();
        assert_eq!(clones.len(), 2);
        assert_eq!(clones[0].name, "alpha");
        assert_eq!(clones[1].name, "beta");

        assert!(repo.list_by_user(999).await.unwrap().is_empty());
    }
}
