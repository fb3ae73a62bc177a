use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use time::OffsetDateTime;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub status: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Answers 201 rather than 200; existing clients key on that status.
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::CREATED,
        Json(HealthResponse {
            date: OffsetDateTime::now_utc(),
            status: "OK",
        }),
    )
}
