//! Admin account models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

use crate::validators::{validate_phone, validate_strong_password, validate_username};

pub const DEFAULT_ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AdminStatus {
    Disabled = 0,
    Enabled = 1,
}

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct AdminUser {
    pub admin_id: String,
    pub username: String,
    pub phone_number: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    pub real_name: Option<String>,
    pub email: String,
    pub role: String,
    pub status: AdminStatus,
    pub last_login_time: Option<DateTime<Utc>>,
    pub login_fail_count: i32,
    pub password_update_time: Option<DateTime<Utc>>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn is_enabled(&self) -> bool {
        self.status == AdminStatus::Enabled
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct CreateAdminRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_strong_password"))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub real_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub role: Option<String>,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UpdateAdminPasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6, max = 64))]
    pub new_password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateAdminStatusRequest {
    pub status: AdminStatus,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub role: Option<String>,
    pub status: Option<AdminStatus>,
}

impl AdminQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedAdminsResponse {
    pub data: Vec<AdminUser>,
    pub meta: PaginationMeta,
}
