use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::approvals::TeacherApproval;
use elysia_models::teachers::{
    PaginatedTeachersResponse, Teacher, TeacherQueryParams, UpdateTeacherDto,
};

use crate::middleware::auth::Identity;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherQueryParams),
    responses(
        (status = 200, description = "Paginated teachers", body = PaginatedTeachersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn get_teachers(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<TeacherQueryParams>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    let teachers = TeacherService::list_teachers(&state, &identity, params).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = String, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher profile", body = Teacher),
        (status = 400, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _identity))]
pub async fn get_teacher(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(TeacherService::get_teacher(&state, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = String, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Updated profile", body = Teacher),
        (status = 403, description = "Only the teacher or an admin"),
        (status = 422, description = "Validation error")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::update_teacher(&state, &identity, &id, dto).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/approval",
    params(("id" = String, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "The teacher's approval record", body = TeacherApproval),
        (status = 400, description = "No approval record"),
        (status = 403, description = "Only the teacher or an admin")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn get_teacher_approval(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<TeacherApproval>, AppError> {
    Ok(Json(TeacherService::get_approval(&state, &identity, &id).await?))
}
