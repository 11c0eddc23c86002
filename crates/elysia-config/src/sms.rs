//! SMS provider configuration.

use crate::{ConfigError, required_var};

#[derive(Clone)]
pub enum SmsProviderConfig {
    /// JSON gateway reached over HTTPS.
    Http {
        endpoint: String,
        api_key: String,
        sign_name: String,
    },
    /// Writes codes to the log instead of sending them.
    Log,
}

impl std::fmt::Debug for SmsProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                endpoint,
                sign_name,
                ..
            } => f
                .debug_struct("Http")
                .field("endpoint", endpoint)
                .field("sign_name", sign_name)
                .finish_non_exhaustive(),
            Self::Log => write!(f, "Log"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SmsConfig {
    pub provider: SmsProviderConfig,
    pub template_id: String,
    /// Code used instead of a random one. Development and tests only.
    pub fixed_code: Option<String>,
}

impl SmsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let template_id = required_var("SMS_TEMPLATE_ID")?;

        let provider = match std::env::var("SMS_PROVIDER")
            .unwrap_or_else(|_| "log".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "http" => SmsProviderConfig::Http {
                endpoint: required_var("SMS_GATEWAY_URL")?,
                api_key: required_var("SMS_API_KEY")?,
                sign_name: required_var("SMS_SIGN_NAME")?,
            },
            "log" => SmsProviderConfig::Log,
            other => {
                return Err(ConfigError::Invalid {
                    name: "SMS_PROVIDER",
                    value: other.to_string(),
                });
            }
        };

        let fixed_code = std::env::var("SMS_FIXED_CODE")
            .ok()
            .filter(|c| !c.trim().is_empty());
        if fixed_code.is_some() {
            tracing::warn!("SMS_FIXED_CODE is set; every verification code will be identical");
        }

        Ok(Self {
            provider,
            template_id,
            fixed_code,
        })
    }

    /// Log provider with a fixed code, for local runs and tests.
    pub fn fixed(code: impl Into<String>) -> Self {
        Self {
            provider: SmsProviderConfig::Log,
            template_id: "TEST_TEMPLATE".to_string(),
            fixed_code: Some(code.into()),
        }
    }
}
