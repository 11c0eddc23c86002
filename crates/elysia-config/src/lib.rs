//! # Elysia Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: session token signing configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`sms`]: SMS provider selection and credentials
//! - [`verification`]: verification-code lifetime and send cooldown
//! - [`server`]: listen address and database pool sizing
//!
//! Required values return [`ConfigError`] so the binary can fail fast at
//! startup instead of running with a placeholder secret.
//!
//! ```ignore
//! use elysia_config::{JwtConfig, SmsConfig, VerificationConfig};
//!
//! let jwt = JwtConfig::from_env()?;
//! let sms = SmsConfig::from_env()?;
//! let verification = VerificationConfig::from_env()?;
//! ```

pub mod cors;
pub mod error;
pub mod jwt;
pub mod server;
pub mod sms;
pub mod verification;

pub use cors::CorsConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProviderConfig};
pub use verification::{CooldownScope, VerificationConfig};

/// Parses an optional numeric variable, falling back to `default` when unset.
pub(crate) fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        _ => Ok(default),
    }
}

pub(crate) fn required_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
