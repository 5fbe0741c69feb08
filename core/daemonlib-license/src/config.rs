//! Startup configuration for the license server.
//!
//! The configuration is read once at startup from a JSON document and then
//! handed, immutably, to [`LicenseRegistry`](crate::LicenseRegistry) and
//! [`TokenService`](crate::TokenService).

use crate::error::{ConfigError, ConfigResult};
use crate::registry::ValidityWindow;
use crate::token::DEFAULT_TOKEN_TTL_HOURS;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use zeroize::Zeroize;

fn default_token_ttl_hours() -> u32 {
    DEFAULT_TOKEN_TTL_HOURS
}

/// Everything the core needs to run: signing secret, license window, and
/// the key-to-owner table.
///
/// The secret is wiped when the configuration is dropped.
#[derive(Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Symmetric secret used to sign and verify tokens.
    pub secret: String,
    /// First day of the shared license window (UTC midnight).
    pub start_date: NaiveDate,
    /// Length of the license window in whole days.
    pub valid_days: u32,
    /// Lifetime of issued tokens in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u32,
    /// License key to owner identity.
    pub licenses: HashMap<String, String>,
}

impl LicenseConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Replaces the secret, typically with one supplied on the command line
    /// or through the environment.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret.zeroize();
        self.secret = secret.into();
        self
    }

    /// Checks that every field holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty secret, a zero-length
    /// window, a zero token lifetime, an empty license table, or a window or
    /// token lifetime reaching past the last representable date.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.secret.is_empty() {
            return Err(ConfigError::Invalid("secret must not be empty".to_string()));
        }
        if self.valid_days == 0 {
            return Err(ConfigError::Invalid(
                "valid_days must be at least 1".to_string(),
            ));
        }
        if self.token_ttl_hours == 0 {
            return Err(ConfigError::Invalid(
                "token_ttl_hours must be at least 1".to_string(),
            ));
        }
        if ValidityWindow::starting_on(self.start_date, self.valid_days)
            .checked_expiry()
            .is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "valid_days {} from {} is out of range",
                self.valid_days, self.start_date
            )));
        }
        if Utc::now()
            .checked_add_signed(Duration::hours(i64::from(self.token_ttl_hours)))
            .is_none()
        {
            return Err(ConfigError::Invalid(format!(
                "token_ttl_hours {} is out of range",
                self.token_ttl_hours
            )));
        }
        if self.licenses.is_empty() {
            return Err(ConfigError::Invalid(
                "licenses table must contain at least one key".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for LicenseConfig {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl std::fmt::Debug for LicenseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseConfig")
            .field("secret", &"[REDACTED]")
            .field("start_date", &self.start_date)
            .field("valid_days", &self.valid_days)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("licenses", &self.licenses.len())
            .finish()
    }
}
