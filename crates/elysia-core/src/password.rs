//! Password hashing with bcrypt.

use anyhow::Context;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .context("Failed to hash password")
        .map_err(AppError::internal)
}

/// Returns `Ok(false)` on mismatch. A malformed stored hash is an internal error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .context("Failed to verify password")
        .map_err(AppError::internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("Secret@123").unwrap();
        assert_ne!(hashed, "Secret@123");
        assert!(verify_password("Secret@123", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_against_garbage_hash_is_error() {
        assert!(verify_password("pw", "not-a-bcrypt-hash").is_err());
    }
}
