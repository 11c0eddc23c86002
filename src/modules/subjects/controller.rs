use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::auth::MessageResponse;
use elysia_models::subjects::{
    CreateSubjectRequest, PaginatedSubjectsResponse, Subject, SubjectQueryParams, SubjectStatus,
    UpdateSubjectRequest,
};

use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/subjects",
    params(SubjectQueryParams),
    responses(
        (status = 200, description = "Paginated subjects", body = PaginatedSubjectsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    Query(params): Query<SubjectQueryParams>,
) -> Result<Json<PaginatedSubjectsResponse>, AppError> {
    Ok(Json(SubjectService::list_subjects(&state, params).await?))
}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject", body = Subject),
        (status = 400, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(SubjectService::get_subject(&state, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/subjects/code/{code}",
    params(("code" = String, Path, description = "Subject code")),
    responses(
        (status = 200, description = "Subject", body = Subject),
        (status = 400, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subject_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(SubjectService::get_subject_by_code(&state, &code).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Subject code already exists"),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Validation error")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_subject(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = SubjectService::create_subject(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[utoipa::path(
    put,
    path = "/api/admin/subjects/{id}",
    params(("id" = String, Path, description = "Subject ID")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Updated subject", body = Subject),
        (status = 400, description = "Subject not found"),
        (status = 403, description = "Admin only")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    Ok(Json(SubjectService::update_subject(&state, &id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/subjects/{id}",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = MessageResponse),
        (status = 400, description = "Subject not found"),
        (status = 403, description = "Admin only")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(SubjectService::delete_subject(&state, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/subjects/{id}/enable",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject enabled", body = Subject),
        (status = 400, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn enable_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>, AppError> {
    let subject = SubjectService::set_status(&state, &id, SubjectStatus::Enabled).await?;
    Ok(Json(subject))
}

#[utoipa::path(
    post,
    path = "/api/admin/subjects/{id}/disable",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject disabled", body = Subject),
        (status = 400, description = "Subject not found")
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn disable_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subject>, AppError> {
    let subject = SubjectService::set_status(&state, &id, SubjectStatus::Disabled).await?;
    Ok(Json(subject))
}
