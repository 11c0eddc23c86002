//! Redis-backed token denylist.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use elysia_auth::{DenylistError, TokenDenylist};

use crate::keys;
use crate::redis::RedisCache;

#[derive(Debug, Clone)]
pub struct RedisTokenDenylist {
    cache: RedisCache,
    prefix: String,
}

impl RedisTokenDenylist {
    pub fn new(cache: RedisCache, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl TokenDenylist for RedisTokenDenylist {
    #[instrument(skip(self, fingerprint))]
    async fn revoke(&self, fingerprint: &str, ttl: Duration) -> Result<(), DenylistError> {
        let key = keys::tokens::revoked(&self.prefix, fingerprint);
        self.cache
            .set_with_ttl(&key, &1, ttl)
            .await
            .map_err(|e| DenylistError(e.to_string()))
    }

    #[instrument(skip(self, fingerprint))]
    async fn is_revoked(&self, fingerprint: &str) -> Result<bool, DenylistError> {
        let key = keys::tokens::revoked(&self.prefix, fingerprint);
        self.cache
            .exists(&key)
            .await
            .map_err(|e| DenylistError(e.to_string()))
    }
}
