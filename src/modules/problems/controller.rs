use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::auth::MessageResponse;
use elysia_models::problems::{
    CreateProblemRequest, PaginatedProblemsResponse, Problem, ProblemQueryParams,
    UpdateProblemRequest,
};

use crate::middleware::auth::Identity;
use crate::modules::problems::service::ProblemService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/problems",
    params(ProblemQueryParams),
    responses(
        (status = 200, description = "Paginated problems", body = PaginatedProblemsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Problems",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_problems(
    State(state): State<AppState>,
    Query(params): Query<ProblemQueryParams>,
) -> Result<Json<PaginatedProblemsResponse>, AppError> {
    Ok(Json(ProblemService::list_problems(&state, params).await?))
}

#[utoipa::path(
    get,
    path = "/api/problems/{id}",
    params(("id" = i64, Path, description = "Problem ID")),
    responses(
        (status = 200, description = "Problem", body = Problem),
        (status = 400, description = "Problem not found")
    ),
    tag = "Problems",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Problem>, AppError> {
    Ok(Json(ProblemService::get_problem(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/problems",
    request_body = CreateProblemRequest,
    responses(
        (status = 201, description = "Problem created", body = Problem),
        (status = 400, description = "Title slug already exists"),
        (status = 403, description = "Teacher or admin only"),
        (status = 422, description = "Validation error")
    ),
    tag = "Problems",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn create_problem(
    State(state): State<AppState>,
    identity: Identity,
    ValidatedJson(dto): ValidatedJson<CreateProblemRequest>,
) -> Result<(StatusCode, Json<Problem>), AppError> {
    let problem = ProblemService::create_problem(&state, &identity, dto).await?;
    Ok((StatusCode::CREATED, Json(problem)))
}

#[utoipa::path(
    put,
    path = "/api/problems/{id}",
    params(("id" = i64, Path, description = "Problem ID")),
    request_body = UpdateProblemRequest,
    responses(
        (status = 200, description = "Updated problem", body = Problem),
        (status = 400, description = "Problem not found or slug taken"),
        (status = 403, description = "Teacher or admin only")
    ),
    tag = "Problems",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn update_problem(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateProblemRequest>,
) -> Result<Json<Problem>, AppError> {
    Ok(Json(ProblemService::update_problem(&state, &identity, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/problems/{id}",
    params(("id" = i64, Path, description = "Problem ID")),
    responses(
        (status = 200, description = "Problem deleted", body = MessageResponse),
        (status = 400, description = "Problem not found"),
        (status = 403, description = "Teacher or admin only")
    ),
    tag = "Problems",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity))]
pub async fn delete_problem(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(ProblemService::delete_problem(&state, &identity, id).await?))
}
