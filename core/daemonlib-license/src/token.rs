//! Signed access tokens.
//!
//! Tokens use the JWS compact form: `base64url(header).base64url(claims).base64url(signature)`
//! signed with HMAC-SHA256 over the process-wide secret. The claim set is:
//! - `license`: the license key the token was issued for
//! - `user`: the owner bound to that key
//! - `exp`: expiry, seconds since epoch
//!
//! A token is valid strictly before `exp`. Tokens carrying any algorithm
//! other than HS256 are rejected.

use crate::config::LicenseConfig;
use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 12;

/// The only accepted signing algorithm.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// License key.
    pub license: String,
    /// Owner identity.
    pub user: String,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedToken {
    /// Owner identity.
    pub user: String,
    /// License key.
    pub license: String,
}

/// Issues and verifies tokens with a fixed symmetric secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    /// Creates a service signing with `secret` and the default 12 hour lifetime.
    ///
    /// The key material is copied once here and held for the service's lifetime.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked against the caller's clock in verify_at.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
            ttl: Duration::hours(i64::from(DEFAULT_TOKEN_TTL_HOURS)),
            validation,
        }
    }

    /// Builds the service described by a loaded configuration.
    #[must_use]
    pub fn from_config(config: &LicenseConfig) -> Self {
        Self::new(config.secret.as_bytes())
            .with_ttl(Duration::hours(i64::from(config.token_ttl_hours)))
    }

    /// Overrides the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `license` and `owner`, expiring one lifetime from now.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Signing`] if the claims cannot be encoded.
    pub fn issue(&self, license: &str, owner: &str) -> LicenseResult<String> {
        self.issue_at(license, owner, Utc::now())
    }

    /// Issues a token as of `now`.
    ///
    /// No license validation happens here; callers check the registry first.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Signing`] if `now + ttl` is outside the
    /// representable date range or the claims cannot be encoded.
    pub fn issue_at(&self, license: &str, owner: &str, now: DateTime<Utc>) -> LicenseResult<String> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| LicenseError::Signing("token expiry out of range".to_string()))?;
        let claims = TokenClaims {
            license: license.to_string(),
            user: owner.to_string(),
            exp: exp.timestamp(),
        };
        self.sign(&claims)
    }

    /// Signs an arbitrary claim set. Exposed for tests that need tokens with
    /// hand-picked expiry.
    pub fn sign(&self, claims: &TokenClaims) -> LicenseResult<String> {
        jsonwebtoken::encode(
            &Header::new(TOKEN_ALGORITHM),
            claims,
            &self.encoding,
        )
        .map_err(|e| LicenseError::Signing(e.to_string()))
    }

    /// Verifies a token using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`TokenService::verify_at`].
    pub fn verify(&self, token: &str) -> LicenseResult<VerifiedToken> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidToken`] for a bad signature, malformed
    /// encoding, a non-HS256 header, missing claims, or `exp <= now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> LicenseResult<VerifiedToken> {
        let data = jsonwebtoken::decode::<TokenClaims>(
            token,
            &self.decoding,
            &self.validation,
        )
        .map_err(|e| {
            debug!("token rejected: {e}");
            LicenseError::InvalidToken
        })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            debug!("token rejected: expired at {}", claims.exp);
            return Err(LicenseError::InvalidToken);
        }

        Ok(VerifiedToken {
            user: claims.user,
            license: claims.license,
        })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
