use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::students::{
    PaginatedStudentsResponse, Student, StudentQueryParams, UpdateLearningProgressDto,
    UpdateStudentDto, UpdateStudentStatusDto,
};

use crate::middleware::auth::Identity;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Paginated students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Teacher or admin only")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn get_students(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::list_students(&state, &identity, params).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student profile", body = Student),
        (status = 400, description = "Student not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _identity))]
pub async fn get_student(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(StudentService::get_student(&state, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Updated profile", body = Student),
        (status = 400, description = "Student not found"),
        (status = 403, description = "Only the student or an admin"),
        (status = 422, description = "Validation error")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(&state, &identity, &id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}/progress",
    params(("id" = String, Path, description = "Student ID")),
    request_body = UpdateLearningProgressDto,
    responses(
        (status = 200, description = "Progress replaced", body = Student),
        (status = 403, description = "Only the student")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn update_learning_progress(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(dto): Json<UpdateLearningProgressDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_learning_progress(&state, &identity, &id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    patch,
    path = "/api/students/{id}/status",
    params(("id" = String, Path, description = "Student ID")),
    request_body = UpdateStudentStatusDto,
    responses(
        (status = 200, description = "Status changed", body = Student),
        (status = 403, description = "Admin only")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn update_student_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(dto): Json<UpdateStudentStatusDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_status(&state, &identity, &id, dto).await?;
    Ok(Json(student))
}
