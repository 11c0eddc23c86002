use crate::{ConfigError, parse_var, required_var};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub addr: String,
    pub database_max_connections: u32,
    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            addr: std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}
