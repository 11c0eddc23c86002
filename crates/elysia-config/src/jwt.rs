use crate::{ConfigError, parse_var, required_var};

pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = required_var("JWT_SECRET")?;
        let access_token_expiry = parse_var("JWT_ACCESS_EXPIRY", 86_400)?; // 24 hours
        Self::new(secret, access_token_expiry)
    }

    pub fn new(secret: impl Into<String>, access_token_expiry: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret { min: MIN_SECRET_LEN });
        }
        Ok(Self {
            secret,
            access_token_expiry,
        })
    }
}
