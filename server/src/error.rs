//! HTTP error mapping.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use daemonlib_license::LicenseError;
use serde::{Deserialize, Serialize};

/// Error body returned by every failing route.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// License or token failure from the core.
    #[error(transparent)]
    License(#[from] LicenseError),

    /// The caller exceeded its request budget for this route.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl ApiError {
    /// Status code reported to the caller.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::License(LicenseError::InvalidLicense | LicenseError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            Self::License(LicenseError::LicenseExpired(_)) => StatusCode::FORBIDDEN,
            Self::License(LicenseError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Message placed in the `detail` field. Never carries internal context.
    #[must_use]
    pub fn detail(&self) -> &'static str {
        match self {
            Self::License(LicenseError::InvalidLicense) => "Invalid license key",
            Self::License(LicenseError::LicenseExpired(_)) => "License expired",
            Self::License(LicenseError::InvalidToken) => "Invalid or expired token",
            Self::License(LicenseError::Signing(_)) => "Internal server error",
            Self::RateLimited { .. } => "Too many requests, slow down.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail().to_string(),
        };
        let mut response = (self.status(), Json(body)).into_response();
        if let Self::RateLimited { retry_after_secs } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_secs),
            );
        }
        response
    }
}
