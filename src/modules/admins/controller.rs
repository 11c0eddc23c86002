use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::admins::{
    AdminQueryParams, AdminUser, CreateAdminRequest, PaginatedAdminsResponse,
    UpdateAdminPasswordRequest, UpdateAdminStatusRequest,
};
use elysia_models::auth::MessageResponse;

use crate::middleware::auth::Identity;
use crate::modules::admins::service::AdminService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminUser),
        (status = 400, description = "Username, email or phone already in use"),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Validation error")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminUser>), AppError> {
    let admin = AdminService::create_admin(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(AdminQueryParams),
    responses(
        (status = 200, description = "Paginated admins", body = PaginatedAdminsResponse),
        (status = 403, description = "Admin only")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_admins(
    State(state): State<AppState>,
    Query(params): Query<AdminQueryParams>,
) -> Result<Json<PaginatedAdminsResponse>, AppError> {
    Ok(Json(AdminService::list_admins(&state, params).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin profile", body = AdminUser),
        (status = 400, description = "Admin not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminUser>, AppError> {
    Ok(Json(AdminService::get_admin(&state, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/password",
    params(("id" = String, Path, description = "Admin ID")),
    request_body = UpdateAdminPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Old password incorrect"),
        (status = 403, description = "Only your own password")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn update_admin_password(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AdminService::update_password(&state, &identity, &id, dto).await?;
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    params(("id" = String, Path, description = "Admin ID")),
    request_body = UpdateAdminStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = AdminUser),
        (status = 400, description = "Admin not found")
    ),
    tag = "Admins",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_admin_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<UpdateAdminStatusRequest>,
) -> Result<Json<AdminUser>, AppError> {
    Ok(Json(AdminService::update_status(&state, &id, dto).await?))
}
