//! Teacher approval records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

use crate::teachers::VerificationStatus;

/// One record per teacher. Holds a snapshot of the application and, once
/// decided, who decided it.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct TeacherApproval {
    pub approval_id: String,
    pub teacher_id: String,
    pub employee_number: String,
    pub school_email: String,
    pub teacher_name: String,
    pub phone_number: String,
    pub department: String,
    pub title: Option<String>,
    pub teaching_subjects: Vec<String>,
    pub teaching_years: i32,
    pub apply_remark: Option<String>,
    pub approval_status: VerificationStatus,
    pub approver_id: Option<String>,
    pub approver_name: Option<String>,
    pub approval_remark: Option<String>,
    pub approval_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeacherApproval {
    pub fn is_pending(&self) -> bool {
        self.approval_status == VerificationStatus::Pending
    }
}

/// Decision applied to a pending approval and its teacher in one step.
#[derive(Debug, Clone)]
pub struct ApprovalDecision {
    pub approval_id: String,
    pub approver_id: String,
    pub approver_name: Option<String>,
    pub approved: bool,
    pub remark: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl ApprovalDecision {
    pub fn status(&self) -> VerificationStatus {
        if self.approved {
            VerificationStatus::Approved
        } else {
            VerificationStatus::Rejected
        }
    }
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ApproveTeacherRequest {
    pub approved: bool,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApprovalQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub status: Option<VerificationStatus>,
    pub department: Option<String>,
    /// Substring match on the teacher's name
    pub name: Option<String>,
}

impl ApprovalQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedApprovalsResponse {
    pub data: Vec<TeacherApproval>,
    pub meta: PaginationMeta,
}
