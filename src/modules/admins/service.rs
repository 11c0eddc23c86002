use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument};

use elysia_auth::role::new_admin_id;
use elysia_core::{AppError, PaginationMeta, hash_password, verify_password};
use elysia_models::admins::{
    AdminQueryParams, AdminStatus, AdminUser, CreateAdminRequest, DEFAULT_ADMIN_ROLE,
    PaginatedAdminsResponse, UpdateAdminPasswordRequest, UpdateAdminStatusRequest,
};
use elysia_models::auth::MessageResponse;

use crate::middleware::auth::Identity;
use crate::state::AppState;
use crate::stores::store_error;

pub struct AdminService;

impl AdminService {
    async fn find_or_reject(state: &AppState, admin_id: &str) -> Result<AdminUser, AppError> {
        state
            .admins
            .find_admin(admin_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("admin not found")))
    }

    /// Admins created here start enabled.
    #[instrument(skip(state, dto), fields(username = %dto.username))]
    pub async fn create_admin(
        state: &AppState,
        dto: CreateAdminRequest,
    ) -> Result<AdminUser, AppError> {
        if state
            .admins
            .find_admin_by_username(&dto.username)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!("username already exists")));
        }
        if state
            .admins
            .find_admin_by_email(&dto.email)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!("email already exists")));
        }
        if let Some(phone) = dto.phone_number.as_deref()
            && state
                .admins
                .find_admin_by_phone(phone)
                .await
                .map_err(store_error)?
                .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "phone number already registered"
            )));
        }

        let now = Utc::now();
        let admin = AdminUser {
            admin_id: new_admin_id(),
            username: dto.username,
            phone_number: dto.phone_number,
            password_hash: hash_password(&dto.password)?,
            real_name: dto.real_name,
            email: dto.email,
            role: dto.role.unwrap_or_else(|| DEFAULT_ADMIN_ROLE.to_string()),
            status: AdminStatus::Enabled,
            last_login_time: None,
            login_fail_count: 0,
            password_update_time: None,
            remark: dto.remark,
            created_at: now,
            updated_at: now,
        };
        state
            .admins
            .create_admin(&admin)
            .await
            .map_err(store_error)?;

        info!(admin_id = %admin.admin_id, "Admin created");
        Ok(admin)
    }

    #[instrument(skip(state))]
    pub async fn list_admins(
        state: &AppState,
        params: AdminQueryParams,
    ) -> Result<PaginatedAdminsResponse, AppError> {
        let (data, total) = state
            .admins
            .list_admins(&params)
            .await
            .map_err(store_error)?;

        Ok(PaginatedAdminsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination()),
        })
    }

    #[instrument(skip(state))]
    pub async fn get_admin(state: &AppState, admin_id: &str) -> Result<AdminUser, AppError> {
        Self::find_or_reject(state, admin_id).await
    }

    #[instrument(skip(state, identity, dto))]
    pub async fn update_password(
        state: &AppState,
        identity: &Identity,
        admin_id: &str,
        dto: UpdateAdminPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        if !identity.is_self(admin_id) {
            return Err(AppError::forbidden(anyhow!(
                "admins may only change their own password"
            )));
        }
        let admin = Self::find_or_reject(state, admin_id).await?;

        if !verify_password(&dto.old_password, &admin.password_hash)? {
            return Err(AppError::bad_request(anyhow!("old password is incorrect")));
        }

        let hash = hash_password(&dto.new_password)?;
        state
            .admins
            .update_admin_password(admin_id, &hash, Utc::now())
            .await
            .map_err(store_error)?;

        info!(admin_id, "Admin password changed");
        Ok(MessageResponse::new("password updated"))
    }

    #[instrument(skip(state))]
    pub async fn update_status(
        state: &AppState,
        admin_id: &str,
        dto: UpdateAdminStatusRequest,
    ) -> Result<AdminUser, AppError> {
        let mut admin = Self::find_or_reject(state, admin_id).await?;

        state
            .admins
            .update_admin_status(admin_id, dto.status)
            .await
            .map_err(store_error)?;

        admin.status = dto.status;
        admin.updated_at = Utc::now();
        Ok(admin)
    }
}
