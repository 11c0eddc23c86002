//! SMS verification codes and send cooldowns.
//!
//! A code is keyed by (phone, purpose), where purpose is `{role}_{code_type}`
//! such as `student_register`. At most one code per key is outstanding; a new
//! save replaces the old one. Sends are rate limited per cooldown scope, and
//! claiming the cooldown slot is atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::keys;
use crate::redis::{CacheError, RedisCache, TakeOutcome};

/// Result of trying to claim the send slot for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendWindow {
    /// The slot was free and is now held for the window.
    Open,
    /// A send happened recently; retry after `wait`.
    Cooling { wait: Duration },
}

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("verification code is incorrect")]
    Mismatch,
    #[error("verification code expired or not sent")]
    ExpiredOrMissing,
    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Claims the send slot for `scope` for `window`.
    async fn check_send_frequency(
        &self,
        scope: &str,
        window: Duration,
    ) -> Result<SendWindow, CacheError>;

    /// Frees a claimed slot when no code ended up being delivered.
    async fn release_send_slot(&self, scope: &str) -> Result<(), CacheError>;

    /// Stores `code`, overwriting any outstanding code for the key.
    async fn save_code(
        &self,
        phone: &str,
        purpose: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    async fn load_code(&self, phone: &str, purpose: &str) -> Result<Option<String>, CacheError>;

    async fn delete_code(&self, phone: &str, purpose: &str) -> Result<(), CacheError>;

    /// Deletes the code only if it equals `code`.
    async fn take_code(
        &self,
        phone: &str,
        purpose: &str,
        code: &str,
    ) -> Result<TakeOutcome, CacheError>;

    /// Compares without consuming.
    async fn verify_code(&self, phone: &str, code: &str, purpose: &str) -> Result<(), CodeError> {
        match self.load_code(phone, purpose).await? {
            None => Err(CodeError::ExpiredOrMissing),
            Some(stored) if stored == code => Ok(()),
            Some(_) => Err(CodeError::Mismatch),
        }
    }

    /// Verifies and deletes in one step, so a code authorizes one action.
    async fn consume_code(&self, phone: &str, code: &str, purpose: &str) -> Result<(), CodeError> {
        match self.take_code(phone, purpose, code).await? {
            TakeOutcome::Taken => Ok(()),
            TakeOutcome::Mismatch => Err(CodeError::Mismatch),
            TakeOutcome::Missing => Err(CodeError::ExpiredOrMissing),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedisVerificationCodeStore {
    cache: RedisCache,
    prefix: String,
}

impl RedisVerificationCodeStore {
    pub fn new(cache: RedisCache, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl VerificationCodeStore for RedisVerificationCodeStore {
    #[instrument(skip(self))]
    async fn check_send_frequency(
        &self,
        scope: &str,
        window: Duration,
    ) -> Result<SendWindow, CacheError> {
        let key = keys::verification::send_lock(&self.prefix, scope);
        if self.cache.set_if_absent(&key, &1, window).await? {
            return Ok(SendWindow::Open);
        }

        // The slot may have expired between the two calls; report a minimal wait.
        let wait = self.cache.ttl(&key).await?.unwrap_or(1).max(1) as u64;
        Ok(SendWindow::Cooling {
            wait: Duration::from_secs(wait),
        })
    }

    async fn release_send_slot(&self, scope: &str) -> Result<(), CacheError> {
        let key = keys::verification::send_lock(&self.prefix, scope);
        self.cache.invalidate(&key).await
    }

    #[instrument(skip(self, code))]
    async fn save_code(
        &self,
        phone: &str,
        purpose: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let key = keys::verification::code(&self.prefix, purpose, phone);
        self.cache.set_with_ttl(&key, &code, ttl).await
    }

    async fn load_code(&self, phone: &str, purpose: &str) -> Result<Option<String>, CacheError> {
        let key = keys::verification::code(&self.prefix, purpose, phone);
        self.cache.get(&key).await
    }

    async fn delete_code(&self, phone: &str, purpose: &str) -> Result<(), CacheError> {
        let key = keys::verification::code(&self.prefix, purpose, phone);
        self.cache.invalidate(&key).await
    }

    async fn take_code(
        &self,
        phone: &str,
        purpose: &str,
        code: &str,
    ) -> Result<TakeOutcome, CacheError> {
        let key = keys::verification::code(&self.prefix, purpose, phone);
        self.cache.take_if_equal(&key, &code).await
    }
}

#[derive(Debug)]
struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

/// In-process store. Expired entries are treated as absent and pruned on write.
#[derive(Debug, Default)]
pub struct MemoryVerificationCodeStore {
    codes: Mutex<HashMap<String, Expiring<String>>>,
    sends: Mutex<HashMap<String, Instant>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CacheError> {
    mutex
        .lock()
        .map_err(|_| CacheError::Unavailable("verification store lock poisoned".into()))
}

fn code_key(phone: &str, purpose: &str) -> String {
    format!("{purpose}:{phone}")
}

impl MemoryVerificationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationCodeStore for MemoryVerificationCodeStore {
    async fn check_send_frequency(
        &self,
        scope: &str,
        window: Duration,
    ) -> Result<SendWindow, CacheError> {
        let now = Instant::now();
        let mut sends = lock(&self.sends)?;
        sends.retain(|_, until| *until > now);

        if let Some(until) = sends.get(scope) {
            let wait = until.duration_since(now);
            // round up so callers never see "retry in 0 seconds"
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            return Ok(SendWindow::Cooling {
                wait: Duration::from_secs(secs.max(1)),
            });
        }

        sends.insert(scope.to_string(), now + window);
        debug!(scope, "Send slot claimed");
        Ok(SendWindow::Open)
    }

    async fn release_send_slot(&self, scope: &str) -> Result<(), CacheError> {
        lock(&self.sends)?.remove(scope);
        Ok(())
    }

    async fn save_code(
        &self,
        phone: &str,
        purpose: &str,
        code: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut codes = lock(&self.codes)?;
        codes.retain(|_, entry| entry.expires_at > now);
        codes.insert(
            code_key(phone, purpose),
            Expiring {
                value: code.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn load_code(&self, phone: &str, purpose: &str) -> Result<Option<String>, CacheError> {
        let codes = lock(&self.codes)?;
        Ok(codes
            .get(&code_key(phone, purpose))
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn delete_code(&self, phone: &str, purpose: &str) -> Result<(), CacheError> {
        lock(&self.codes)?.remove(&code_key(phone, purpose));
        Ok(())
    }

    async fn take_code(
        &self,
        phone: &str,
        purpose: &str,
        code: &str,
    ) -> Result<TakeOutcome, CacheError> {
        let key = code_key(phone, purpose);
        let mut codes = lock(&self.codes)?;

        let outcome = match codes.get(&key) {
            Some(entry) if entry.expires_at <= Instant::now() => TakeOutcome::Missing,
            Some(entry) if entry.value == code => TakeOutcome::Taken,
            Some(_) => TakeOutcome::Mismatch,
            None => TakeOutcome::Missing,
        };
        if outcome == TakeOutcome::Taken {
            codes.remove(&key);
        }
        Ok(outcome)
    }
}
