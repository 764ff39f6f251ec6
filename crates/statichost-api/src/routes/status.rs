//! Domain status endpoint.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use statichost_core::Domain;
use statichost_pipeline::StatusReport;

use crate::AppState;
use crate::auth::{SecretParam, require_secret};
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new().route("/status/{domain}", get(status))
}

async fn status(
    State(state): State<AppState>,
    Path(raw_domain): Path<String>,
    Query(params): Query<SecretParam>,
) -> Result<Json<StatusReport>, ApiError> {
    require_secret(&state, &params)?;
    let domain = Domain::parse(&raw_domain)?;
    Ok(Json(state.status.status(&domain).await))
}
