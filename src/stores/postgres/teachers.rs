use async_trait::async_trait;
use tracing::instrument;

use elysia_models::approvals::TeacherApproval;
use elysia_models::teachers::{Teacher, TeacherQueryParams};

use super::{PgStore, map_write_error};
use crate::stores::{StoreResult, TeacherStore};

const TEACHER_COLUMNS: &str = "teacher_id, phone_number, password_hash, teacher_name, \
    employee_number, school_email, gender, image_url, teaching_subjects, teaching_years, \
    department, title, verification_status, verification_time, verifier_id, \
    verification_remark, status, created_at, updated_at";

impl PgStore {
    async fn fetch_teacher_by(&self, column: &str, value: &str) -> StoreResult<Option<Teacher>> {
        let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE {column} = $1");
        Ok(sqlx::query_as::<_, Teacher>(&sql)
            .bind(value)
            .fetch_optional(self.pool())
            .await?)
    }
}

#[async_trait]
impl TeacherStore for PgStore {
    #[instrument(skip(self))]
    async fn find_teacher(&self, teacher_id: &str) -> StoreResult<Option<Teacher>> {
        self.fetch_teacher_by("teacher_id", teacher_id).await
    }

    #[instrument(skip(self))]
    async fn find_teacher_by_phone(&self, phone: &str) -> StoreResult<Option<Teacher>> {
        self.fetch_teacher_by("phone_number", phone).await
    }

    #[instrument(skip(self))]
    async fn find_teacher_by_employee_number(
        &self,
        number: &str,
    ) -> StoreResult<Option<Teacher>> {
        self.fetch_teacher_by("employee_number", number).await
    }

    #[instrument(skip(self))]
    async fn find_teacher_by_email(&self, email: &str) -> StoreResult<Option<Teacher>> {
        self.fetch_teacher_by("school_email", email).await
    }

    #[instrument(skip(self, teacher, approval), fields(teacher_id = %teacher.teacher_id))]
    async fn create_teacher(
        &self,
        teacher: &Teacher,
        approval: &TeacherApproval,
    ) -> StoreResult<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO teachers (
                teacher_id, phone_number, password_hash, teacher_name, employee_number,
                school_email, gender, image_url, teaching_subjects, teaching_years, department,
                title, verification_status, verification_time, verifier_id, verification_remark,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19)
            "#,
        )
        .bind(&teacher.teacher_id)
        .bind(&teacher.phone_number)
        .bind(&teacher.password_hash)
        .bind(&teacher.teacher_name)
        .bind(&teacher.employee_number)
        .bind(&teacher.school_email)
        .bind(&teacher.gender)
        .bind(&teacher.image_url)
        .bind(&teacher.teaching_subjects)
        .bind(teacher.teaching_years)
        .bind(&teacher.department)
        .bind(&teacher.title)
        .bind(teacher.verification_status)
        .bind(teacher.verification_time)
        .bind(&teacher.verifier_id)
        .bind(&teacher.verification_remark)
        .bind(teacher.status)
        .bind(teacher.created_at)
        .bind(teacher.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        sqlx::query(
            r#"
            INSERT INTO teacher_approvals (
                approval_id, teacher_id, employee_number, school_email, teacher_name,
                phone_number, department, title, teaching_subjects, teaching_years,
                apply_remark, approval_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(&approval.approval_id)
        .bind(&approval.teacher_id)
        .bind(&approval.employee_number)
        .bind(&approval.school_email)
        .bind(&approval.teacher_name)
        .bind(&approval.phone_number)
        .bind(&approval.department)
        .bind(&approval.title)
        .bind(&approval.teaching_subjects)
        .bind(approval.teaching_years)
        .bind(&approval.apply_remark)
        .bind(approval.approval_status)
        .bind(approval.created_at)
        .bind(approval.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self, teacher), fields(teacher_id = %teacher.teacher_id))]
    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE teachers
            SET password_hash = $2, teacher_name = $3, gender = $4, image_url = $5,
                teaching_subjects = $6, teaching_years = $7, department = $8, title = $9,
                status = $10, updated_at = $11
            WHERE teacher_id = $1
            "#,
        )
        .bind(&teacher.teacher_id)
        .bind(&teacher.password_hash)
        .bind(&teacher.teacher_name)
        .bind(&teacher.gender)
        .bind(&teacher.image_url)
        .bind(&teacher.teaching_subjects)
        .bind(teacher.teaching_years)
        .bind(&teacher.department)
        .bind(&teacher.title)
        .bind(teacher.status)
        .bind(teacher.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_teachers(&self, params: &TeacherQueryParams) -> StoreResult<(Vec<Teacher>, i64)> {
        let page = params.pagination();
        let filter = r#"
            WHERE ($1::varchar IS NULL OR department = $1)
              AND ($2::smallint IS NULL OR verification_status = $2)
              AND ($3::smallint IS NULL OR status = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM teachers {filter}"))
            .bind(&params.department)
            .bind(params.verification_status)
            .bind(params.status)
            .fetch_one(self.pool())
            .await?;

        let sql = format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers {filter} \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        );
        let teachers = sqlx::query_as::<_, Teacher>(&sql)
            .bind(&params.department)
            .bind(params.verification_status)
            .bind(params.status)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((teachers, total))
    }
}
