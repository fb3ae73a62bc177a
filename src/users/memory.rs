use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::{
    repo::{RepoError, UserRepository},
    repo_types::User,
};

/// Map-backed store with the same uniqueness and not-found rules as Postgres.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(RepoError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            image: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, name: &str, image: Option<&str>) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.name = name.to_string();
        if let Some(image) = image {
            user.image = Some(image.to_string());
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_find_by_email() {
        let repo = InMemoryUserRepository::default();
        let created = repo.create("Ann", "ann@x.com", "$argon2id$digest").await.unwrap();
        let found = repo.find_by_email("ann@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.created_at, found.updated_at);
        assert!(repo.find_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::default();
        repo.create("Ann", "ann@x.com", "h1").await.unwrap();
        let err = repo.create("Other Ann", "ann@x.com", "h2").await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }

    #[tokio::test]
    async fn update_keeps_image_when_absent() {
        let repo = InMemoryUserRepository::default();
        let user = repo.create("Ann", "ann@x.com", "h").await.unwrap();

        let updated = repo.update(user.id, "Anna", Some("a.png")).await.unwrap();
        assert_eq!(updated.image.as_deref(), Some("a.png"));

        let renamed = repo.update(user.id, "Annie", None).await.unwrap();
        assert_eq!(renamed.name, "Annie");
        assert_eq!(renamed.image.as_deref(), Some("a.png"));
        assert_eq!(renamed.id, user.id);
        assert_eq!(renamed.email, "ann@x.com");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let repo = InMemoryUserRepository::default();
        let err = repo.update(Uuid::new_v4(), "Ann", None).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
