use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::auth::MessageResponse;
use elysia_models::classes::{
    Class, ClassQueryParams, CreateClassRequest, JoinClassRequest, PaginatedClassesResponse,
    PaginatedMembersResponse, UpdateClassRequest,
};

use crate::middleware::auth::Identity;
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 400, description = "Teacher account not activated"),
        (status = 403, description = "Teacher only"),
        (status = 422, description = "Validation error")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(dto): ValidatedJson<CreateClassRequest>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = ClassService::create_class(&state, &identity, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes/mine",
    params(ClassQueryParams),
    responses(
        (status = 200, description = "Owned or joined classes", body = PaginatedClassesResponse),
        (status = 403, description = "Admins have no classes")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn get_my_classes(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<ClassQueryParams>,
) -> Result<Json<PaginatedClassesResponse>, AppError> {
    Ok(Json(ClassService::my_classes(&state, &identity, params).await?))
}

#[utoipa::path(
    post,
    path = "/api/classes/join",
    request_body = JoinClassRequest,
    responses(
        (status = 200, description = "Joined", body = Class),
        (status = 400, description = "Unknown code, class closed or full, or already joined"),
        (status = 403, description = "Student only")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn join_class(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(dto): ValidatedJson<JoinClassRequest>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(ClassService::join_class(&state, &identity, dto).await?))
}

#[utoipa::path(
    get,
    path = "/api/classes/code/{code}",
    params(("code" = String, Path, description = "Class join code")),
    responses(
        (status = 200, description = "Class", body = Class),
        (status = 400, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _identity))]
pub async fn get_class_by_code(
    State(state): State<AppState>,
    _identity: Identity,
    Path(code): Path<String>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(ClassService::get_class_by_code(&state, &code).await?))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class", body = Class),
        (status = 400, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _identity))]
pub async fn get_class(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(ClassService::get_class(&state, &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Updated class", body = Class),
        (status = 400, description = "Class not found"),
        (status = 403, description = "Owner only")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateClassRequest>,
) -> Result<Json<Class>, AppError> {
    Ok(Json(ClassService::update_class(&state, &identity, &id, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/leave",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Left class", body = MessageResponse),
        (status = 400, description = "Not a member"),
        (status = 403, description = "Student only")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn leave_class(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(ClassService::leave_class(&state, &identity, &id).await?))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/members",
    params(("id" = String, Path, description = "Class ID"), ClassQueryParams),
    responses(
        (status = 200, description = "Active members", body = PaginatedMembersResponse),
        (status = 400, description = "Class not found")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _identity))]
pub async fn get_class_members(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
    Query(params): Query<ClassQueryParams>,
) -> Result<Json<PaginatedMembersResponse>, AppError> {
    Ok(Json(ClassService::list_members(&state, &id, params).await?))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}/members/{student_id}",
    params(
        ("id" = String, Path, description = "Class ID"),
        ("student_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student removed", body = MessageResponse),
        (status = 400, description = "Not a member"),
        (status = 403, description = "Owner only")
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn remove_class_member(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = ClassService::remove_member(&state, &identity, &id, &student_id).await?;
    Ok(Json(response))
}
