//! Redis client for short-lived application state.
//!
//! Values are stored as JSON strings.

use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Redis client with a multiplexed, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of [`RedisCache::take_if_equal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeOutcome {
    /// Value matched and the key was deleted.
    Taken,
    /// Key exists with a different value; left untouched.
    Mismatch,
    Missing,
}

// Returns 1 when deleted, 0 on mismatch, -1 when the key is absent.
const TAKE_IF_EQUAL: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    return -1
end
if current == ARGV[1] then
    redis.call('DEL', KEYS[1])
    return 1
end
return 0
"#;

impl RedisCache {
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(key).await? {
            Some(value) => {
                debug!(cache.key = %key, "Cache hit");
                Ok(Some(serde_json::from_str(&value)?))
            }
            None => {
                debug!(cache.key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Sets a value, replacing any previous one.
    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set_with_ttl<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(value)?;

        conn.set_ex::<_, _, ()>(key, json, ttl.as_secs().max(1))
            .await?;

        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");

        Ok(())
    }

    /// Sets a value only if the key is absent. Returns `true` when the value
    /// was written.
    #[instrument(skip(self, value), fields(cache.operation = "SET_NX_EX"))]
    pub async fn set_if_absent<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<bool, CacheError>
    where
        T: Serialize,
    {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(value)?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;

        let written = reply.is_some();
        debug!(cache.key = %key, cache.written = written, "Conditional set");

        Ok(written)
    }

    /// Atomically deletes `key` if it currently holds `expected`.
    #[instrument(skip(self, expected), fields(cache.operation = "TAKE_IF_EQUAL"))]
    pub async fn take_if_equal<T>(&self, key: &str, expected: &T) -> Result<TakeOutcome, CacheError>
    where
        T: Serialize,
    {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(expected)?;

        let result: i64 = Script::new(TAKE_IF_EQUAL)
            .key(key)
            .arg(json)
            .invoke_async(&mut conn)
            .await?;

        let outcome = match result {
            1 => TakeOutcome::Taken,
            0 => TakeOutcome::Mismatch,
            _ => TakeOutcome::Missing,
        };
        debug!(cache.key = %key, ?outcome, "Compare and delete");

        Ok(outcome)
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(key).await?;

        debug!(cache.key = %key, "Cache invalidated");

        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "EXISTS"))]
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists::<_, bool>(key).await?)
    }

    /// Remaining TTL in seconds; `None` if the key doesn't exist or has no TTL.
    #[instrument(skip(self), fields(cache.operation = "TTL"))]
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, CacheError> {
        let mut conn = self.conn.clone();

        match conn.ttl::<_, i64>(key).await? {
            ttl if ttl > 0 => Ok(Some(ttl)),
            _ => Ok(None), // -1 (no expiry) or -2 (doesn't exist)
        }
    }
}
