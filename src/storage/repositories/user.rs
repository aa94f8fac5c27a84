//! User repository: account persistence and credential lookup.

use crate::auth::user::{NewUser, User};
use crate::domain::UserId;
use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence contract for user accounts. "Not found" is `Ok(None)`;
/// errors are reserved for the store itself failing.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user. A duplicate email surfaces as a conflict.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Get a user by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get a user by email (case-sensitive, as stored)
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user with their password hash for authentication
    async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>>;
}

#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_user(&self, row: UserRow) -> User {
        User {
            id: UserId::from_string(row.id),
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id), name = "db_create_user")]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if err.as_database_error().is_some_and(|db_err| db_err.is_unique_violation()) {
                Error::conflict("user already exists", "user")
            } else {
                Error::Database { source: err, context: "Failed to create user".to_string() }
            }
        })?;

        self.get_user(&user.id)
            .await?
            .ok_or_else(|| Error::internal("User not found after creation"))
    }

    #[instrument(skip(self), fields(user_id = %id), name = "db_get_user")]
    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch user".to_string(),
        })?;

        Ok(row.map(|r| self.row_to_user(r)))
    }

    #[instrument(skip(self, email), name = "db_get_user_by_email")]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch user by email".to_string(),
        })?;

        Ok(row.map(|r| self.row_to_user(r)))
    }

    #[instrument(skip(self, email), name = "db_get_user_with_password")]
    async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::Database {
            source: err,
            context: "Failed to fetch user with password".to_string(),
        })?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            (self.row_to_user(row), password_hash)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::memory_pool;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=768,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_user() {
        let repo = SqlxUserRepository::new(memory_pool().await);

        let created = repo.create_user(new_user("a@example.com")).await.unwrap();
        assert_eq!(created.email, "a@example.com");

        let by_id = repo.get_user(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.id, created.id);

        let by_email = repo.get_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repo = SqlxUserRepository::new(memory_pool().await);
        repo.create_user(new_user("a@example.com")).await.unwrap();

        let err = repo.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let repo = SqlxUserRepository::new(memory_pool().await);
        repo.create_user(new_user("A@Example.com")).await.unwrap();

        assert!(repo.get_user_by_email("a@example.com").await.unwrap().is_none());
        assert!(repo.get_user_by_email("A@Example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_user_is_none_not_an_error() {
        let repo = SqlxUserRepository::new(memory_pool().await);

        assert!(repo.get_user(&UserId::new()).await.unwrap().is_none());
        assert!(repo.get_user_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(repo.get_user_with_password("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn password_hash_comes_back_only_on_the_credential_path() {
        let repo = SqlxUserRepository::new(memory_pool().await);
        let user = new_user("a@example.com");
        let expected_hash = user.password_hash.clone();
        repo.create_user(user).await.unwrap();

        let (_, hash) = repo.get_user_with_password("a@example.com").await.unwrap().unwrap();
        assert_eq!(hash, expected_hash);
    }
}
