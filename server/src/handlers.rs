//! Route handlers for authentication and token verification.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// Liveness payload for `GET /`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

/// Body of `POST /auth`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LicenseRequest {
    pub license_key: String,
}

/// Successful `POST /auth` response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthResponse {
    pub access: String,
    pub user: String,
    pub expires_on: NaiveDate,
    pub days_left: u32,
    pub token: String,
}

/// Query string of `GET /verify`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VerifyQuery {
    pub token: String,
}

/// Successful `GET /verify` response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: String,
    pub license: String,
}

pub(crate) async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "daemonlib server online".to_string(),
    })
}

/// Checks the license key and, if it is live, issues a token for its owner.
pub(crate) async fn auth_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LicenseRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let status = state.registry.check(&body.license_key).inspect_err(|e| {
        warn!("License check failed: {}", e);
    })?;

    let token = state.tokens.issue(&body.license_key, &status.owner)?;
    info!(
        "Access granted to {} ({} days left)",
        status.owner, status.days_left
    );

    Ok(Json(AuthResponse {
        access: "granted".to_string(),
        user: status.owner,
        expires_on: status.expires_on,
        days_left: status.days_left,
        token,
    }))
}

pub(crate) async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let verified = state.tokens.verify(&query.token)?;
    Ok(Json(VerifyResponse {
        valid: true,
        user: verified.user,
        license: verified.license,
    }))
}
