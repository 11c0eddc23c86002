use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument};

use elysia_core::{AppError, PaginationMeta};
use elysia_models::approvals::{
    ApprovalDecision, ApprovalQueryParams, PaginatedApprovalsResponse, TeacherApproval,
};
use elysia_models::auth::{MessageResponse, RoleProfile};
use elysia_models::teachers::Teacher;

use crate::middleware::auth::Identity;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::stores::store_error;

pub struct ApprovalService;

impl ApprovalService {
    async fn find_or_reject(state: &AppState, approval_id: &str) -> Result<TeacherApproval, AppError> {
        state
            .approvals
            .find_approval(approval_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("approval not found")))
    }

    fn approver_name(identity: &Identity) -> Option<String> {
        match &identity.profile {
            RoleProfile::Admin(admin) => Some(
                admin
                    .real_name
                    .clone()
                    .unwrap_or_else(|| admin.username.clone()),
            ),
            _ => None,
        }
    }

    #[instrument(skip(state))]
    pub async fn list_approvals(
        state: &AppState,
        params: ApprovalQueryParams,
    ) -> Result<PaginatedApprovalsResponse, AppError> {
        let (data, total) = state
            .approvals
            .list_approvals(&params)
            .await
            .map_err(store_error)?;

        Ok(PaginatedApprovalsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination()),
        })
    }

    #[instrument(skip(state))]
    pub async fn get_approval(state: &AppState, approval_id: &str) -> Result<TeacherApproval, AppError> {
        Self::find_or_reject(state, approval_id).await
    }

    /// Approving activates the teacher; rejecting only records the outcome.
    /// A decision is final.
    #[instrument(skip(state, identity, remark), fields(approver_id = %identity.subject_id))]
    pub async fn decide(
        state: &AppState,
        identity: &Identity,
        approval_id: &str,
        approved: bool,
        remark: Option<String>,
    ) -> Result<TeacherApproval, AppError> {
        let approval = Self::find_or_reject(state, approval_id).await?;
        if !approval.is_pending() {
            return Err(AppError::bad_request(anyhow!("approval already processed")));
        }

        let decision = ApprovalDecision {
            approval_id: approval.approval_id,
            approver_id: identity.subject_id.clone(),
            approver_name: Self::approver_name(identity),
            approved,
            remark,
            decided_at: Utc::now(),
        };
        let decided = state
            .approvals
            .decide_approval(&decision)
            .await
            .map_err(store_error)?;

        info!(
            approval_id = %decided.approval_id,
            teacher_id = %decided.teacher_id,
            approved,
            "Teacher approval decided"
        );
        Ok(decided)
    }

    /// Decides through the teacher's own approval record and returns the
    /// updated teacher.
    #[instrument(skip(state, identity, remark))]
    pub async fn verify_teacher(
        state: &AppState,
        identity: &Identity,
        teacher_id: &str,
        approved: bool,
        remark: Option<String>,
    ) -> Result<Teacher, AppError> {
        TeacherService::find_or_reject(state, teacher_id).await?;
        let approval = state
            .approvals
            .find_approval_by_teacher(teacher_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("approval record not found")))?;

        Self::decide(state, identity, &approval.approval_id, approved, remark).await?;
        TeacherService::find_or_reject(state, teacher_id).await
    }

    #[instrument(skip(state))]
    pub async fn delete_approval(state: &AppState, approval_id: &str) -> Result<MessageResponse, AppError> {
        let approval = Self::find_or_reject(state, approval_id).await?;
        if !approval.is_pending() {
            return Err(AppError::bad_request(anyhow!(
                "only pending approvals can be deleted"
            )));
        }

        let deleted = state
            .approvals
            .delete_pending_approval(approval_id)
            .await
            .map_err(store_error)?;
        if !deleted {
            return Err(AppError::bad_request(anyhow!("approval already processed")));
        }
        Ok(MessageResponse::new("approval deleted"))
    }
}
