mod app;
mod config;
mod error;
mod health;
mod state;
mod users;

use crate::config::{AppConfig, LogConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.log);
    let state = AppState::init(&config).await?;

    let app = app::build_app(state);
    app::serve(app, &config).await
}

fn init_tracing(log: &LogConfig) {
    let subscriber = tracing_subscriber::fmt().with_env_filter(log.filter.as_str());
    if log.json {
        subscriber.with_target(false).json().init();
    } else {
        subscriber.init();
    }
}
