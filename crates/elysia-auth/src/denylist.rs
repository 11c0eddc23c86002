//! Storage for invalidated session tokens.
//!
//! Tokens are stored by fingerprint (hex SHA-256 of the encoded token) and
//! only for as long as the token could still pass signature and expiry checks.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
#[error("token denylist unavailable: {0}")]
pub struct DenylistError(pub String);

#[async_trait]
pub trait TokenDenylist: Send + Sync {
    /// Marks a fingerprint as revoked for `ttl`. Revoking twice is not an error.
    async fn revoke(&self, fingerprint: &str, ttl: Duration) -> Result<(), DenylistError>;

    async fn is_revoked(&self, fingerprint: &str) -> Result<bool, DenylistError>;
}

pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// In-process denylist. Entries are dropped lazily once expired.
#[derive(Debug, Default)]
pub struct MemoryDenylist {
    entries: Mutex<HashMap<String, Instant>>,
}

impl MemoryDenylist {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Instant>>, DenylistError> {
        self.entries
            .lock()
            .map_err(|_| DenylistError("denylist lock poisoned".to_string()))
    }
}

#[async_trait]
impl TokenDenylist for MemoryDenylist {
    async fn revoke(&self, fingerprint: &str, ttl: Duration) -> Result<(), DenylistError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, expires| *expires > now);
        entries.insert(fingerprint.to_string(), now + ttl);
        Ok(())
    }

    async fn is_revoked(&self, fingerprint: &str) -> Result<bool, DenylistError> {
        let entries = self.lock()?;
        Ok(entries
            .get(fingerprint)
            .is_some_and(|expires| *expires > Instant::now()))
    }
}
