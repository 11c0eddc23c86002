//! # Elysia Core
//!
//! Core types, errors, and utilities shared by every Elysia crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination parameters and metadata
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use elysia_core::errors::AppError;
//! use elysia_core::pagination::PaginationParams;
//! use elysia_core::password::{hash_password, verify_password};
//!
//! let error = AppError::bad_request(anyhow::anyhow!("Student not found"));
//! let hash = hash_password("secure_password")?;
//! let params = PaginationParams::default();
//! let offset = params.offset();
//! ```

pub mod errors;
pub mod pagination;
pub mod password;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
