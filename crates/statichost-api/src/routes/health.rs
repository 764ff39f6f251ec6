//! Health check endpoint. Reflects container runtime reachability only,
//! not deploy health.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let docker = if state.executor.ping().await {
        "ok"
    } else {
        "error"
    };

    Json(json!({
        "status": "ok",
        "docker": docker,
        "compiler_config": state.pipeline.compiler(),
    }))
}
