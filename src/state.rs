use crate::config::AppConfig;
use crate::users::repo::{PgUserRepository, UserRepository};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await
            .context("connect to database")?;

        if config.database.run_migrations {
            match sqlx::migrate!("./migrations").run(&db).await {
                Ok(()) => tracing::info!("database migrations applied"),
                Err(e) => tracing::warn!(error = %e, "migration failed; continuing"),
            }
        }

        let users = Arc::new(PgUserRepository::new(db)) as Arc<dyn UserRepository>;
        Ok(Self::from_parts(users))
    }

    pub fn from_parts(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::memory::InMemoryUserRepository;

        Self::from_parts(Arc::new(InMemoryUserRepository::default()))
    }
}
