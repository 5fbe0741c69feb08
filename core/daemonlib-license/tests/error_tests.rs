use daemonlib_license::{ConfigError, LicenseError};

#[test]
fn error_display_invalid_license() {
    let err = LicenseError::InvalidLicense;
    assert!(format!("{err}").contains("invalid license key"));
}

#[test]
fn error_display_license_expired() {
    let err = LicenseError::LicenseExpired("2025-12-29".into());
    let msg = format!("{err}");
    assert!(msg.contains("expired"));
    assert!(msg.contains("2025-12-29"));
}

#[test]
fn error_display_invalid_token_is_coarse() {
    let err = LicenseError::InvalidToken;
    assert_eq!(format!("{err}"), "invalid or expired token");
}

#[test]
fn error_display_signing() {
    let err = LicenseError::Signing("boom".into());
    assert!(format!("{err}").contains("signing failed"));
}

#[test]
fn config_error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let config_err: ConfigError = serde_err.unwrap_err().into();
    assert!(format!("{config_err}").contains("invalid config JSON"));
}

#[test]
fn config_error_invalid() {
    let err = ConfigError::Invalid("valid_days must be at least 1".into());
    assert!(format!("{err}").contains("valid_days"));
}

#[test]
fn error_is_debug_and_clone() {
    let err = LicenseError::InvalidToken;
    let copy = err.clone();
    assert_eq!(err, copy);
    let _ = format!("{err:?}");
}
