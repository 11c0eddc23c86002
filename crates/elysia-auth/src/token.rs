//! Session token issuing, validation and invalidation.
//!
//! Tokens are HS256 JWTs with no refresh flow. A token stops validating when
//! it expires or when it is invalidated through [`TokenService::invalidate`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use elysia_config::JwtConfig;

use crate::claims::Claims;
use crate::denylist::{TokenDenylist, token_fingerprint};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    InvalidSignature,
    #[error("token revoked")]
    Revoked,
    #[error("token does not belong to this subject")]
    SubjectMismatch,
    #[error("failed to issue token: {0}")]
    Issue(String),
    #[error(transparent)]
    Denylist(#[from] crate::denylist::DenylistError),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
    denylist: Arc<dyn TokenDenylist>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: JwtConfig, denylist: Arc<dyn TokenDenylist>) -> Self {
        Self { config, denylist }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.config.access_token_expiry
    }

    pub fn issue(&self, subject_id: &str) -> Result<IssuedToken, TokenError> {
        let now = Utc::now().timestamp();
        self.issue_at(subject_id, now)
    }

    fn issue_at(&self, subject_id: &str, now: i64) -> Result<IssuedToken, TokenError> {
        let jti: u128 = rand::thread_rng().r#gen();
        let claims = Claims {
            sub: subject_id.to_string(),
            jti: format!("{jti:032x}"),
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Issue(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    fn decode(&self, token: &str, check_expiry: bool) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::InvalidSignature,
        })
    }

    /// Checks signature, expiry and the denylist, in that order.
    #[instrument(skip_all)]
    pub async fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token, true)?;
        if self.denylist.is_revoked(&token_fingerprint(token)).await? {
            debug!(subject = %claims.sub, "Rejected revoked token");
            return Err(TokenError::Revoked);
        }
        Ok(claims)
    }

    /// Revokes `token` for the rest of its lifetime. Already expired tokens
    /// are left alone since they can no longer validate.
    #[instrument(skip(self, token))]
    pub async fn invalidate(&self, subject_id: &str, token: &str) -> Result<(), TokenError> {
        let claims = self.decode(token, false)?;
        if claims.sub != subject_id {
            return Err(TokenError::SubjectMismatch);
        }

        let remaining = claims.exp - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }

        self.denylist
            .revoke(
                &token_fingerprint(token),
                Duration::from_secs(remaining.max(1) as u64),
            )
            .await?;
        debug!("Token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denylist::MemoryDenylist;

    fn service() -> TokenService {
        let config = JwtConfig::new("test-secret-that-is-at-least-32-bytes!!", 3600).unwrap();
        TokenService::new(config, Arc::new(MemoryDenylist::new()))
    }

    #[tokio::test]
    async fn test_issue_then_validate() {
        let tokens = service();
        let issued = tokens.issue("stu_123").unwrap();
        let claims = tokens.validate(&issued.token).await.unwrap();
        assert_eq!(claims.sub, "stu_123");
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_issue() {
        let tokens = service();
        let a = tokens.issue("stu_123").unwrap();
        let b = tokens.issue("stu_123").unwrap();
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let tokens = service();
        let issued = tokens
            .issue_at("stu_123", Utc::now().timestamp() - 7200)
            .unwrap();
        assert!(matches!(
            tokens.validate(&issued.token).await,
            Err(TokenError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_tampered_token() {
        let tokens = service();
        let issued = tokens.issue("stu_123").unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert!(matches!(
            tokens.validate(&tampered).await,
            Err(TokenError::InvalidSignature)
        ));
        assert!(matches!(
            tokens.validate("not.a.jwt").await,
            Err(TokenError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn test_other_secret_is_rejected() {
        let tokens = service();
        let other = TokenService::new(
            JwtConfig::new("another-secret-that-is-32-bytes-long!!", 3600).unwrap(),
            Arc::new(MemoryDenylist::new()),
        );
        let issued = other.issue("stu_123").unwrap();
        assert!(matches!(
            tokens.validate(&issued.token).await,
            Err(TokenError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn test_invalidate_then_validate_is_revoked() {
        let tokens = service();
        let issued = tokens.issue("tea_42").unwrap();
        tokens.invalidate("tea_42", &issued.token).await.unwrap();
        assert!(matches!(
            tokens.validate(&issued.token).await,
            Err(TokenError::Revoked)
        ));
        // idempotent
        tokens.invalidate("tea_42", &issued.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_only_affects_that_token() {
        let tokens = service();
        let first = tokens.issue("tea_42").unwrap();
        let second = tokens.issue("tea_42").unwrap();
        tokens.invalidate("tea_42", &first.token).await.unwrap();
        assert!(tokens.validate(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_requires_matching_subject() {
        let tokens = service();
        let issued = tokens.issue("tea_42").unwrap();
        assert!(matches!(
            tokens.invalidate("stu_1", &issued.token).await,
            Err(TokenError::SubjectMismatch)
        ));
        assert!(tokens.validate(&issued.token).await.is_ok());
    }
}
