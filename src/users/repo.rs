use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::users::repo_types::User;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("email already in use")]
    Conflict,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence port for user records. Every call is a fresh round trip.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Fails with [`RepoError::Conflict`] when the email is taken, even if a
    /// concurrent insert won the race after the caller's own lookup.
    async fn create(&self, name: &str, email: &str, password_hash: &str)
        -> Result<User, RepoError>;

    /// Changes name and, when given, image. `None` keeps the stored image.
    async fn update(&self, id: Uuid, name: &str, image: Option<&str>) -> Result<User, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, image, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, image, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepoError::Conflict
            }
            other => RepoError::Database(other),
        })
    }

    async fn update(&self, id: Uuid, name: &str, image: Option<&str>) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, image = COALESCE($3, image), updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(image)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }
}
