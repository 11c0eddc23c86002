//! Admin bootstrap.

use anyhow::{Context, bail};
use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use elysia_auth::role::new_admin_id;
use elysia_core::hash_password;
use elysia_models::admins::{AdminStatus, CreateAdminRequest, DEFAULT_ADMIN_ROLE};

/// Inserts an enabled admin and returns its id.
///
/// The request goes through the same validation as `POST /api/admin/users`.
pub async fn create_admin(db: &PgPool, request: CreateAdminRequest) -> anyhow::Result<String> {
    if let Err(errors) = request.validate() {
        bail!("invalid admin details: {errors}");
    }

    let password_hash = hash_password(&request.password).map_err(|e| e.error)?;
    let admin_id = new_admin_id();
    let now = Utc::now();

    let inserted = sqlx::query_scalar::<_, String>(
        "INSERT INTO admin_users (admin_id, username, phone_number, password_hash, real_name,
             email, role, status, login_fail_count, remark, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9, $10, $10)
         ON CONFLICT DO NOTHING
         RETURNING admin_id",
    )
    .bind(&admin_id)
    .bind(&request.username)
    .bind(&request.phone_number)
    .bind(&password_hash)
    .bind(&request.real_name)
    .bind(&request.email)
    .bind(request.role.as_deref().unwrap_or(DEFAULT_ADMIN_ROLE))
    .bind(AdminStatus::Enabled)
    .bind(&request.remark)
    .bind(now)
    .fetch_optional(db)
    .await
    .context("failed to insert admin")?;

    match inserted {
        Some(id) => Ok(id),
        None => bail!("an admin with this username, email or phone number already exists"),
    }
}
