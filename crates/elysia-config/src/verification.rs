//! Verification-code lifetime and send cooldown.

use crate::{ConfigError, parse_var};

/// What a send cooldown is keyed by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CooldownScope {
    /// One cooldown per phone number across all purposes.
    #[default]
    Phone,
    /// Independent cooldown for each (phone, purpose) pair.
    PhoneAndPurpose,
}

impl std::str::FromStr for CooldownScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "purpose" | "phone_purpose" => Ok(Self::PhoneAndPurpose),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VerificationConfig {
    /// Seconds a code stays valid.
    pub code_ttl_secs: u64,
    /// Seconds between two sends for the same scope.
    pub cooldown_secs: u64,
    pub cooldown_scope: CooldownScope,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 300,
            cooldown_secs: 60,
            cooldown_scope: CooldownScope::Phone,
        }
    }
}

impl VerificationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let cooldown_scope = match std::env::var("VERIFICATION_COOLDOWN_SCOPE") {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "VERIFICATION_COOLDOWN_SCOPE",
                    value: raw,
                })?
            }
            _ => defaults.cooldown_scope,
        };

        Ok(Self {
            code_ttl_secs: parse_var("VERIFICATION_CODE_TTL", defaults.code_ttl_secs)?,
            cooldown_secs: parse_var("VERIFICATION_COOLDOWN", defaults.cooldown_secs)?,
            cooldown_scope,
        })
    }

    /// Key the cooldown is tracked under for a given phone and purpose.
    pub fn cooldown_key(&self, phone: &str, purpose: &str) -> String {
        match self.cooldown_scope {
            CooldownScope::Phone => phone.to_string(),
            CooldownScope::PhoneAndPurpose => format!("{phone}:{purpose}"),
        }
    }
}
