//! # Elysia Cache
//!
//! Short-lived state kept outside the relational store:
//!
//! - [`redis`]: thin async Redis client with JSON values
//! - [`verification`]: SMS verification codes and send cooldowns
//! - [`denylist`]: Redis-backed store for invalidated session tokens
//! - [`keys`]: key layout
//!
//! Every store has an in-process counterpart so the API can run without
//! Redis during development and tests.
//!
//! ```ignore
//! use elysia_cache::{CacheConfig, RedisCache, RedisVerificationCodeStore};
//!
//! let config = CacheConfig::from_env();
//! let cache = RedisCache::new(&config.redis_url).await?;
//! let codes = RedisVerificationCodeStore::new(cache, config.key_prefix.clone());
//! ```

pub mod config;
pub mod denylist;
pub mod keys;
pub mod redis;
pub mod verification;

pub use config::CacheConfig;
pub use denylist::RedisTokenDenylist;
pub use redis::{CacheError, RedisCache, TakeOutcome};
pub use verification::{
    CodeError, MemoryVerificationCodeStore, RedisVerificationCodeStore, SendWindow,
    VerificationCodeStore,
};
