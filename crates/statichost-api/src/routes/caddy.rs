//! On-demand TLS authorization hook.
//!
//! The reverse proxy asks here before issuing a certificate. The answer
//! is a pure existence check on the domain's served directory; no secret
//! is required because the proxy calls it for arbitrary inbound SNI
//! names.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tracing::info;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/caddy-check", get(caddy_check))
}

#[derive(Debug, Deserialize)]
struct CaddyCheckParams {
    domain: Option<String>,
}

async fn caddy_check(
    State(state): State<AppState>,
    Query(params): Query<CaddyCheckParams>,
) -> Response {
    let Some(domain) = params.domain else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    if state.status.exists(&domain) {
        info!(domain = %domain, "TLS issuance allowed");
        (StatusCode::OK, "ok").into_response()
    } else {
        info!(domain = %domain, "TLS issuance refused");
        StatusCode::NOT_FOUND.into_response()
    }
}
