//! License key registry and the shared validity window.
//!
//! Every key in the registry shares one window: it opens at `start` and
//! closes `valid_days` whole days later. A key is valid while the current
//! time is at or before the close of the window.

use crate::config::LicenseConfig;
use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// The global window during which all license keys are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    start: DateTime<Utc>,
    valid_days: u32,
}

impl ValidityWindow {
    /// Creates a window opening at `start` and lasting `valid_days` days.
    #[must_use]
    pub fn new(start: DateTime<Utc>, valid_days: u32) -> Self {
        Self { start, valid_days }
    }

    /// Creates a window opening at UTC midnight of `date`.
    #[must_use]
    pub fn starting_on(date: NaiveDate, valid_days: u32) -> Self {
        Self::new(date.and_time(NaiveTime::MIN).and_utc(), valid_days)
    }

    /// Returns the instant the window opens.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the window length in days.
    #[must_use]
    pub fn valid_days(&self) -> u32 {
        self.valid_days
    }

    /// Returns the instant the window closes, or `None` if `start + valid_days`
    /// is past the last representable date.
    #[must_use]
    pub fn checked_expiry(&self) -> Option<DateTime<Utc>> {
        self.start
            .checked_add_signed(Duration::seconds(i64::from(self.valid_days) * SECS_PER_DAY))
    }

    /// Returns the instant the window closes (`start + valid_days`), saturating
    /// at the last representable date.
    #[must_use]
    pub fn expiry(&self) -> DateTime<Utc> {
        self.checked_expiry().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Result of a successful license check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatus {
    /// Owner identity bound to the key.
    pub owner: String,
    /// Calendar date (UTC) on which the window closes.
    pub expires_on: NaiveDate,
    /// Whole days left until the window closes, rounded down.
    pub days_left: u32,
}

/// Immutable mapping from license key to owner, plus the shared window.
#[derive(Debug, Clone)]
pub struct LicenseRegistry {
    licenses: HashMap<String, String>,
    window: ValidityWindow,
}

impl LicenseRegistry {
    /// Creates a registry from a key-to-owner table and a window.
    #[must_use]
    pub fn new(licenses: HashMap<String, String>, window: ValidityWindow) -> Self {
        Self { licenses, window }
    }

    /// Builds the registry described by a loaded configuration.
    #[must_use]
    pub fn from_config(config: &LicenseConfig) -> Self {
        Self::new(
            config.licenses.clone(),
            ValidityWindow::starting_on(config.start_date, config.valid_days),
        )
    }

    /// Returns the shared validity window.
    #[must_use]
    pub fn window(&self) -> &ValidityWindow {
        &self.window
    }

    /// Returns the number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    /// Returns true if no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    /// Checks a key against the registry using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`LicenseRegistry::check_at`].
    pub fn check(&self, key: &str) -> LicenseResult<LicenseStatus> {
        self.check_at(key, Utc::now())
    }

    /// Checks a key against the registry as of `now`.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::InvalidLicense`] if the key is not registered.
    /// - [`LicenseError::LicenseExpired`] if `now` is past the window's close.
    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> LicenseResult<LicenseStatus> {
        let owner = self
            .licenses
            .get(key)
            .ok_or(LicenseError::InvalidLicense)?;

        let expiry = self.window.expiry();
        let expires_on = expiry.date_naive();
        if now > expiry {
            return Err(LicenseError::LicenseExpired(expires_on.to_string()));
        }

        // num_days truncates toward zero; the difference is non-negative here.
        let days_left = u32::try_from((expiry - now).num_days()).unwrap_or(u32::MAX);

        Ok(LicenseStatus {
            owner: owner.clone(),
            expires_on,
            days_left,
        })
    }
}
