use async_trait::async_trait;
use tracing::instrument;

use elysia_models::approvals::{ApprovalDecision, ApprovalQueryParams, TeacherApproval};
use elysia_models::teachers::{TeacherStatus, VerificationStatus};

use super::PgStore;
use crate::stores::{ApprovalStore, StoreError, StoreResult};

const APPROVAL_COLUMNS: &str = "approval_id, teacher_id, employee_number, school_email, \
    teacher_name, phone_number, department, title, teaching_subjects, teaching_years, \
    apply_remark, approval_status, approver_id, approver_name, approval_remark, approval_time, \
    created_at, updated_at";

#[async_trait]
impl ApprovalStore for PgStore {
    #[instrument(skip(self))]
    async fn find_approval(&self, approval_id: &str) -> StoreResult<Option<TeacherApproval>> {
        let sql = format!("SELECT {APPROVAL_COLUMNS} FROM teacher_approvals WHERE approval_id = $1");
        Ok(sqlx::query_as::<_, TeacherApproval>(&sql)
            .bind(approval_id)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_approval_by_teacher(
        &self,
        teacher_id: &str,
    ) -> StoreResult<Option<TeacherApproval>> {
        let sql = format!("SELECT {APPROVAL_COLUMNS} FROM teacher_approvals WHERE teacher_id = $1");
        Ok(sqlx::query_as::<_, TeacherApproval>(&sql)
            .bind(teacher_id)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self))]
    async fn list_approvals(
        &self,
        params: &ApprovalQueryParams,
    ) -> StoreResult<(Vec<TeacherApproval>, i64)> {
        let page = params.pagination();
        let name_pattern = params.name.as_ref().map(|n| format!("%{n}%"));
        let filter = r#"
            WHERE ($1::smallint IS NULL OR approval_status = $1)
              AND ($2::varchar IS NULL OR department = $2)
              AND ($3::varchar IS NULL OR teacher_name ILIKE $3)
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM teacher_approvals {filter}"))
                .bind(params.status)
                .bind(&params.department)
                .bind(&name_pattern)
                .fetch_one(self.pool())
                .await?;

        let sql = format!(
            "SELECT {APPROVAL_COLUMNS} FROM teacher_approvals {filter} \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        );
        let approvals = sqlx::query_as::<_, TeacherApproval>(&sql)
            .bind(params.status)
            .bind(&params.department)
            .bind(&name_pattern)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((approvals, total))
    }

    #[instrument(skip(self, decision), fields(approval_id = %decision.approval_id))]
    async fn decide_approval(&self, decision: &ApprovalDecision) -> StoreResult<TeacherApproval> {
        let mut tx = self.pool().begin().await?;

        let sql = format!(
            r#"
            UPDATE teacher_approvals
            SET approval_status = $2, approver_id = $3, approver_name = $4,
                approval_remark = $5, approval_time = $6, updated_at = $6
            WHERE approval_id = $1 AND approval_status = $7
            RETURNING {APPROVAL_COLUMNS}
            "#
        );
        let approval = sqlx::query_as::<_, TeacherApproval>(&sql)
            .bind(&decision.approval_id)
            .bind(decision.status())
            .bind(&decision.approver_id)
            .bind(&decision.approver_name)
            .bind(&decision.remark)
            .bind(decision.decided_at)
            .bind(VerificationStatus::Pending)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::Rejected("approval already processed".into()))?;

        // Rejected teachers keep their current account status.
        let status = decision.approved.then_some(TeacherStatus::Active);
        sqlx::query(
            r#"
            UPDATE teachers
            SET verification_status = $2, verification_time = $3, verifier_id = $4,
                verification_remark = $5, status = COALESCE($6, status), updated_at = $3
            WHERE teacher_id = $1
            "#,
        )
        .bind(&approval.teacher_id)
        .bind(decision.status())
        .bind(decision.decided_at)
        .bind(&decision.approver_id)
        .bind(&decision.remark)
        .bind(status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(approval)
    }

    #[instrument(skip(self))]
    async fn delete_pending_approval(&self, approval_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM teacher_approvals WHERE approval_id = $1 AND approval_status = $2",
        )
        .bind(approval_id)
        .bind(VerificationStatus::Pending)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
