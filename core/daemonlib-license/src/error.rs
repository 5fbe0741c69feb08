//! Error types for the licensing module.

use thiserror::Error;

/// Licensing and token errors.
///
/// Token failures collapse into [`LicenseError::InvalidToken`] regardless of
/// which check rejected the token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LicenseError {
    /// The license key is not in the registry.
    #[error("invalid license key")]
    InvalidLicense,

    /// The key is known but the global license window has closed.
    #[error("license expired on {0}")]
    LicenseExpired(String),

    /// Token signature, encoding, algorithm, or expiry check failed.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The claim set could not be encoded and signed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Errors raised while loading the startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or is missing fields.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field has a value that cannot be used.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
