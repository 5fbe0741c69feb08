//! HTTP API for the DaemonLib license server.
//!
//! Routes:
//! - `GET /` liveness
//! - `POST /auth` license check and token issuance
//! - `GET /verify?token=…` token verification
//!
//! `/auth` and `/verify` are throttled per client address by
//! [`rate_limit::throttle`].

pub mod error;
pub mod handlers;
pub mod rate_limit;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use daemonlib_license::{LicenseConfig, LicenseRegistry, TokenService};

pub use error::{ApiError, ErrorBody};
pub use handlers::{AuthResponse, LicenseRequest, StatusResponse, VerifyQuery, VerifyResponse};
pub use rate_limit::{FixedWindowLimiter, RateLimits};

/// Shared, read-only state behind every route.
#[derive(Debug)]
pub struct AppState {
    pub registry: LicenseRegistry,
    pub tokens: TokenService,
}

impl AppState {
    #[must_use]
    pub fn new(registry: LicenseRegistry, tokens: TokenService) -> Self {
        Self { registry, tokens }
    }

    /// Builds the registry and token service from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &LicenseConfig) -> Self {
        Self::new(
            LicenseRegistry::from_config(config),
            TokenService::from_config(config),
        )
    }
}

fn throttled(route: MethodRouter<Arc<AppState>>, limit: Option<u32>) -> MethodRouter<Arc<AppState>> {
    match limit {
        Some(limit) => route.layer(from_fn_with_state(
            Arc::new(FixedWindowLimiter::per_minute(limit)),
            rate_limit::throttle,
        )),
        None => route,
    }
}

/// Build the HTTP API router with the given state and request budgets.
pub fn build_router(state: Arc<AppState>, limits: RateLimits) -> Router {
    Router::new()
        .route("/", get(handlers::status_handler))
        .route(
            "/auth",
            throttled(post(handlers::auth_handler), limits.auth_per_minute),
        )
        .route(
            "/verify",
            throttled(get(handlers::verify_handler), limits.verify_per_minute),
        )
        .with_state(state)
}
