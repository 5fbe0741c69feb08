//! Shared test helpers for license tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use daemonlib_license::{LicenseRegistry, TokenService, ValidityWindow};
use std::collections::HashMap;

pub const TEST_SECRET: &str = "test-secret-do-not-use";

/// Day 0 of the test window: 2025-12-27T00:00:00Z.
pub fn day0() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2025, 12, 27)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Returns `day0() + n` days.
pub fn day(n: i64) -> DateTime<Utc> {
    day0() + Duration::days(n)
}

/// Registry `{"ABC-123": "Acme"}` with a two-day window opening on day 0.
pub fn acme_registry() -> LicenseRegistry {
    let mut licenses = HashMap::new();
    licenses.insert("ABC-123".to_string(), "Acme".to_string());
    LicenseRegistry::new(licenses, ValidityWindow::new(day0(), 2))
}

pub fn test_service() -> TokenService {
    TokenService::new(TEST_SECRET)
}

/// Flips one bit of the decoded signature segment and re-encodes the token.
pub fn flip_signature_bit(token: &str, bit: usize) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "token must have three segments");
    let mut sig = URL_SAFE_NO_PAD.decode(parts[2]).unwrap();
    let byte = (bit / 8) % sig.len();
    sig[byte] ^= 1 << (bit % 8);
    format!("{}.{}.{}", parts[0], parts[1], URL_SAFE_NO_PAD.encode(sig))
}

/// Sample configuration JSON matching the shipped default table.
pub fn sample_config_json() -> String {
    r#"{
        "secret": "super-secret-key-change-this",
        "start_date": "2025-12-27",
        "valid_days": 2,
        "licenses": {
            "DMLIB-7X9Q2-AF8KD-M3P7L": "Custom-Dev",
            "DMLIB-QA8F7-M39KD-XP2L7": "ShadowOps"
        }
    }"#
    .to_string()
}
