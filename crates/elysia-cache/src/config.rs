//! Redis cache configuration.

use std::env;

/// Redis configuration loaded from environment variables.
///
/// - `REDIS_URL`: connection URL. When unset the API falls back to
///   in-process stores.
/// - `CACHE_PREFIX`: prefix for all keys (default: `elysia`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "elysia".into()),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "elysia".into(),
        }
    }
}
