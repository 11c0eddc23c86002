//! Request middleware and extractors.
//!
//! - [`auth`]: bearer-token authentication, producing an [`auth::Identity`]
//! - [`role`]: the admin sub-check for the `/api/admin` group
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `require_auth` validates the token and checks the denylist
//! 3. The role is resolved from the subject id prefix and the profile loaded
//! 4. Handlers take `Identity` as an extractor and apply per-route role rules

pub mod auth;
pub mod role;
