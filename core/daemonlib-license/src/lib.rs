//! License validation and token issuance for DaemonLib.
//!
//! This module handles:
//! - Checking license keys against a fixed registry and a shared validity window
//! - Issuing short-lived signed tokens for valid keys
//! - Verifying presented tokens without any server-side session state
//!
//! # Design Principles
//!
//! - **Immutable state**: registry, window and secret are fixed at startup
//! - **Stateless tokens**: a token is the only record of its own existence
//! - **Coarse errors**: callers never learn which token check failed
//!
//! # Token Format
//!
//! Tokens are HS256 JWS compact strings: `header.claims.signature`, each part
//! base64url without padding. Claims are `license`, `user` and `exp`.

mod config;
mod error;
mod registry;
mod token;

pub use config::LicenseConfig;
pub use error::{ConfigError, ConfigResult, LicenseError, LicenseResult};
pub use registry::{LicenseRegistry, LicenseStatus, ValidityWindow};
pub use token::{
    TokenClaims, TokenService, VerifiedToken, DEFAULT_TOKEN_TTL_HOURS, TOKEN_ALGORITHM,
};
