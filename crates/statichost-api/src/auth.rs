//! Shared-secret request authorization.
//!
//! Every mutating or inspecting endpoint requires a `?secret=` query
//! parameter matching the process-wide secret. The TLS existence check
//! and the health probe are deliberately open.

use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SecretParam {
    pub secret: Option<String>,
}

/// Check the shared secret; a missing or mismatching value is a 401 with
/// an empty body.
pub fn require_secret(state: &AppState, params: &SecretParam) -> Result<(), ApiError> {
    match params.secret.as_deref() {
        Some(secret) if secret == &*state.secret => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
