//! Deploy log retrieval endpoints. Logs are opaque text blobs.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use statichost_core::{DeployId, Domain};

use crate::AppState;
use crate::auth::{SecretParam, require_secret};
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logs/{domain}", get(latest_log))
        .route("/logs/{domain}/{deploy_id}", get(log_by_id))
}

/// Most recent deploy log for a domain, by modification time.
async fn latest_log(
    State(state): State<AppState>,
    Path(raw_domain): Path<String>,
    Query(params): Query<SecretParam>,
) -> Result<String, ApiError> {
    require_secret(&state, &params)?;
    let domain = Domain::parse(&raw_domain)?;
    Ok(state.status.latest_log(&domain)?)
}

/// One specific deploy log.
async fn log_by_id(
    State(state): State<AppState>,
    Path((raw_domain, raw_deploy_id)): Path<(String, String)>,
    Query(params): Query<SecretParam>,
) -> Result<String, ApiError> {
    require_secret(&state, &params)?;
    let domain = Domain::parse(&raw_domain)?;
    let deploy_id = DeployId::parse(&raw_deploy_id)?;
    Ok(state.status.log(&domain, &deploy_id)?)
}
