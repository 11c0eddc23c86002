//! # Elysia CLI
//!
//! Administrative commands for Elysia deployments.
//!
//! - [`admin`]: bootstrap an enabled admin account. SMS-registered admins
//!   start disabled, so the first admin has to come from here.
//! - [`seeder`]: fake students, approved teachers and subjects for
//!   development databases.
//!
//! ```ignore
//! use elysia_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
