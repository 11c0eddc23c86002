use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use elysia_models::admins::{AdminQueryParams, AdminStatus, AdminUser};

use super::{PgStore, map_write_error};
use crate::stores::{AdminStore, StoreResult};

const ADMIN_COLUMNS: &str = "admin_id, username, phone_number, password_hash, real_name, email, \
    role, status, last_login_time, login_fail_count, password_update_time, remark, created_at, \
    updated_at";

impl PgStore {
    async fn fetch_admin_by(&self, column: &str, value: &str) -> StoreResult<Option<AdminUser>> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE {column} = $1");
        Ok(sqlx::query_as::<_, AdminUser>(&sql)
            .bind(value)
            .fetch_optional(self.pool())
            .await?)
    }
}

#[async_trait]
impl AdminStore for PgStore {
    #[instrument(skip(self))]
    async fn find_admin(&self, admin_id: &str) -> StoreResult<Option<AdminUser>> {
        self.fetch_admin_by("admin_id", admin_id).await
    }

    #[instrument(skip(self))]
    async fn find_admin_by_phone(&self, phone: &str) -> StoreResult<Option<AdminUser>> {
        self.fetch_admin_by("phone_number", phone).await
    }

    #[instrument(skip(self))]
    async fn find_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        self.fetch_admin_by("username", username).await
    }

    #[instrument(skip(self))]
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<AdminUser>> {
        self.fetch_admin_by("email", email).await
    }

    #[instrument(skip(self, admin), fields(admin_id = %admin.admin_id))]
    async fn create_admin(&self, admin: &AdminUser) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_users (
                admin_id, username, phone_number, password_hash, real_name, email, role, status,
                last_login_time, login_fail_count, password_update_time, remark, created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(&admin.admin_id)
        .bind(&admin.username)
        .bind(&admin.phone_number)
        .bind(&admin.password_hash)
        .bind(&admin.real_name)
        .bind(&admin.email)
        .bind(&admin.role)
        .bind(admin.status)
        .bind(admin.last_login_time)
        .bind(admin.login_fail_count)
        .bind(admin.password_update_time)
        .bind(&admin.remark)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_admin_password(
        &self,
        admin_id: &str,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE admin_users
            SET password_hash = $2, password_update_time = $3, updated_at = $3
            WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .bind(password_hash)
        .bind(at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_admin_status(&self, admin_id: &str, status: AdminStatus) -> StoreResult<()> {
        sqlx::query("UPDATE admin_users SET status = $2, updated_at = NOW() WHERE admin_id = $1")
            .bind(admin_id)
            .bind(status)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_admin_login(&self, admin_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            "UPDATE admin_users SET last_login_time = $2, login_fail_count = 0 WHERE admin_id = $1",
        )
        .bind(admin_id)
        .bind(at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_admin_login_failure(&self, admin_id: &str) -> StoreResult<()> {
        sqlx::query(
            "UPDATE admin_users SET login_fail_count = login_fail_count + 1 WHERE admin_id = $1",
        )
        .bind(admin_id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_admins(&self, params: &AdminQueryParams) -> StoreResult<(Vec<AdminUser>, i64)> {
        let page = params.pagination();
        let filter = r#"
            WHERE ($1::varchar IS NULL OR role = $1)
              AND ($2::smallint IS NULL OR status = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM admin_users {filter}"))
            .bind(&params.role)
            .bind(params.status)
            .fetch_one(self.pool())
            .await?;

        let sql = format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users {filter} \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        let admins = sqlx::query_as::<_, AdminUser>(&sql)
            .bind(&params.role)
            .bind(params.status)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((admins, total))
    }
}
