//! # Elysia Auth
//!
//! Session tokens and role resolution.
//!
//! - [`claims`]: JWT claim structure
//! - [`token`]: [`TokenService`] issuing, validating and invalidating tokens
//! - [`denylist`]: storage for invalidated tokens
//! - [`role`]: subject identifier prefixes and the [`Role`] they map to
//!
//! ```ignore
//! use elysia_auth::{TokenService, MemoryDenylist, resolve_role};
//!
//! let tokens = TokenService::new(jwt_config, Arc::new(MemoryDenylist::default()));
//! let issued = tokens.issue("stu_1700000000000000000")?;
//! let claims = tokens.validate(&issued.token).await?;
//! let role = resolve_role(&claims.sub)?;
//! ```

pub mod claims;
pub mod denylist;
pub mod role;
pub mod token;

pub use claims::Claims;
pub use denylist::{DenylistError, MemoryDenylist, TokenDenylist, token_fingerprint};
pub use role::{Role, RoleError, resolve_role};
pub use token::{IssuedToken, TokenError, TokenService};
