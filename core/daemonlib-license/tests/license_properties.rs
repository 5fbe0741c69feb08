//! Property-based tests for the license core.
//!
//! These tests verify properties that must always hold:
//! - Unregistered keys are always rejected
//! - Registered keys are accepted inside the window and rejected after it
//! - Issued tokens verify back to the same identity
//! - Any signature bit flip is detected

mod common;

use chrono::Duration;
use common::{acme_registry, day, day0, flip_signature_bit, test_service};
use daemonlib_license::LicenseError;
use proptest::prelude::*;

fn identity_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _.-]{0,64}").unwrap()
}

// =============================================================================
// REGISTRY PROPERTIES
// =============================================================================

mod registry_properties {
    use super::*;

    proptest! {
        /// Any key other than the registered one is rejected as invalid.
        #[test]
        fn unknown_keys_are_invalid(key in identity_strategy(), offset_secs in -1_000_000i64..1_000_000) {
            prop_assume!(key != "ABC-123");
            let now = day0() + Duration::seconds(offset_secs);
            prop_assert_eq!(
                acme_registry().check_at(&key, now).unwrap_err(),
                LicenseError::InvalidLicense
            );
        }

        /// Inside the window the owner is returned and days_left never exceeds the window.
        #[test]
        fn registered_key_inside_window(offset_secs in 0i64..=(2 * 86_400)) {
            let now = day0() + Duration::seconds(offset_secs);
            let status = acme_registry().check_at("ABC-123", now).unwrap();
            prop_assert_eq!(status.owner, "Acme");
            prop_assert!(status.days_left <= 2);
        }

        /// Past the window the key is reported as expired.
        #[test]
        fn registered_key_after_window(offset_secs in 1i64..10_000_000) {
            let now = day(2) + Duration::seconds(offset_secs);
            let is_expired = matches!(
                acme_registry().check_at("ABC-123", now),
                Err(LicenseError::LicenseExpired(_))
            );
            prop_assert!(is_expired);
        }
    }
}

// =============================================================================
// TOKEN PROPERTIES
// =============================================================================

mod token_properties {
    use super::*;

    proptest! {
        /// verify(issue(l, o)) returns (l, o) before the lifetime elapses.
        #[test]
        fn roundtrip_preserves_identity(
            license in identity_strategy(),
            owner in identity_strategy(),
            elapsed_secs in 0i64..(12 * 3600),
        ) {
            let service = test_service();
            let token = service.issue_at(&license, &owner, day0()).unwrap();
            let verified = service
                .verify_at(&token, day0() + Duration::seconds(elapsed_secs))
                .unwrap();
            prop_assert_eq!(verified.license, license);
            prop_assert_eq!(verified.user, owner);
        }

        /// Flipping any single signature bit is detected.
        #[test]
        fn signature_bit_flip_is_detected(bit in 0usize..256) {
            let service = test_service();
            let token = service.issue_at("ABC-123", "Acme", day0()).unwrap();
            let tampered = flip_signature_bit(&token, bit);
            prop_assert_eq!(
                service.verify_at(&tampered, day0()).unwrap_err(),
                LicenseError::InvalidToken
            );
        }

        /// Once the lifetime has elapsed the token never verifies again.
        #[test]
        fn expired_tokens_stay_expired(extra_secs in 0i64..10_000_000) {
            let service = test_service();
            let token = service.issue_at("ABC-123", "Acme", day0()).unwrap();
            let now = day0() + Duration::hours(12) + Duration::seconds(extra_secs);
            prop_assert_eq!(
                service.verify_at(&token, now).unwrap_err(),
                LicenseError::InvalidToken
            );
        }
    }
}
