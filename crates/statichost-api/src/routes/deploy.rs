//! Deploy trigger endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use statichost_core::Domain;
use statichost_pipeline::DeployOutcome;
use tracing::info;

use crate::AppState;
use crate::auth::{SecretParam, require_secret};
use crate::error::{ApiError, deploy_status};

pub fn router() -> Router<AppState> {
    Router::new().route("/deploy/{domain}", post(deploy))
}

#[derive(Debug, Serialize)]
struct DeployResponse {
    success: bool,
    #[serde(flatten)]
    outcome: DeployOutcome,
}

/// Run the full deploy pipeline for a domain.
///
/// Error bodies always name the domain, and the deploy id once one was
/// allocated, so operators can correlate with the durable log. An invalid
/// domain never allocates a deploy id and never touches the filesystem.
async fn deploy(
    State(state): State<AppState>,
    Path(raw_domain): Path<String>,
    Query(params): Query<SecretParam>,
) -> Result<Response, ApiError> {
    require_secret(&state, &params)?;

    let domain = match Domain::parse(&raw_domain) {
        Ok(domain) => domain,
        Err(e) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string(), "domain": raw_domain })),
            )
                .into_response());
        }
    };

    info!(domain = %domain, "Deploy requested");
    match state.pipeline.deploy(&domain).await {
        Ok(outcome) => Ok(Json(DeployResponse {
            success: true,
            outcome,
        })
        .into_response()),
        Err(failure) => Ok((
            deploy_status(&failure.error),
            Json(json!({
                "error": failure.error.to_string(),
                "domain": domain,
                "deploy_id": failure.deploy_id,
            })),
        )
            .into_response()),
    }
}
