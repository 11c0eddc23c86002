use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use elysia_core::AppError;
use elysia_models::approvals::{
    ApprovalQueryParams, ApproveTeacherRequest, PaginatedApprovalsResponse, TeacherApproval,
};
use elysia_models::auth::MessageResponse;
use elysia_models::teachers::{Teacher, VerifyTeacherRequest};

use crate::middleware::auth::Identity;
use crate::modules::approvals::service::ApprovalService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/approvals",
    params(ApprovalQueryParams),
    responses(
        (status = 200, description = "Paginated approvals", body = PaginatedApprovalsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    tag = "Approvals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_approvals(
    State(state): State<AppState>,
    Query(params): Query<ApprovalQueryParams>,
) -> Result<Json<PaginatedApprovalsResponse>, AppError> {
    Ok(Json(ApprovalService::list_approvals(&state, params).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/approvals/{id}",
    params(("id" = String, Path, description = "Approval ID")),
    responses(
        (status = 200, description = "Approval record", body = TeacherApproval),
        (status = 400, description = "Approval not found")
    ),
    tag = "Approvals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_approval(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeacherApproval>, AppError> {
    Ok(Json(ApprovalService::get_approval(&state, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/approvals/{id}/approve",
    params(("id" = String, Path, description = "Approval ID")),
    request_body = ApproveTeacherRequest,
    responses(
        (status = 200, description = "Decision recorded", body = TeacherApproval),
        (status = 400, description = "Not found or already processed")
    ),
    tag = "Approvals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn approve_teacher(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<ApproveTeacherRequest>,
) -> Result<Json<TeacherApproval>, AppError> {
    let approval =
        ApprovalService::decide(&state, &identity, &id, dto.approved, dto.remark).await?;
    Ok(Json(approval))
}

#[utoipa::path(
    delete,
    path = "/api/admin/approvals/{id}",
    params(("id" = String, Path, description = "Approval ID")),
    responses(
        (status = 200, description = "Pending approval deleted", body = MessageResponse),
        (status = 400, description = "Not found or no longer pending")
    ),
    tag = "Approvals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_approval(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(ApprovalService::delete_approval(&state, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/teachers/{id}/verify",
    params(("id" = String, Path, description = "Teacher ID")),
    request_body = VerifyTeacherRequest,
    responses(
        (status = 200, description = "Teacher after the decision", body = Teacher),
        (status = 400, description = "Teacher or approval not found, or already processed")
    ),
    tag = "Approvals",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, dto))]
pub async fn verify_teacher(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<VerifyTeacherRequest>,
) -> Result<Json<Teacher>, AppError> {
    let teacher =
        ApprovalService::verify_teacher(&state, &identity, &id, dto.approved, dto.remark).await?;
    Ok(Json(teacher))
}
