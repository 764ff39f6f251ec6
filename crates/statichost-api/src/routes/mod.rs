//! API routes.

pub mod caddy;
pub mod deploy;
pub mod health;
pub mod logs;
pub mod status;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;

/// Build the main API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(deploy::router())
        .merge(logs::router())
        .merge(status::router())
        .merge(caddy::router())
        .merge(health::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "endpoint not found" })),
    )
}
