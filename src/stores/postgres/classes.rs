use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use elysia_core::PaginationParams;
use elysia_models::classes::{Class, ClassMember, ClassMemberDetail, ClassStatus, MemberStatus};

use super::{PgStore, map_write_error};
use crate::stores::{ClassStore, StoreError, StoreResult};

const CLASS_COLUMNS: &str = "c.class_id, c.class_name, c.class_code, c.teacher_id, c.subject, \
    c.semester, c.max_students, c.current_students, c.description, c.announcement, c.status, \
    c.created_at, c.updated_at";

#[derive(sqlx::FromRow)]
struct Capacity {
    status: ClassStatus,
    max_students: i32,
    current_students: i32,
}

#[async_trait]
impl ClassStore for PgStore {
    #[instrument(skip(self, class), fields(class_id = %class.class_id))]
    async fn create_class(&self, class: &Class) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO classes (
                class_id, class_name, class_code, teacher_id, subject, semester, max_students,
                current_students, description, announcement, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&class.class_id)
        .bind(&class.class_name)
        .bind(&class.class_code)
        .bind(&class.teacher_id)
        .bind(&class.subject)
        .bind(&class.semester)
        .bind(class.max_students)
        .bind(class.current_students)
        .bind(&class.description)
        .bind(&class.announcement)
        .bind(class.status)
        .bind(class.created_at)
        .bind(class.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_class(&self, class_id: &str) -> StoreResult<Option<Class>> {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes c WHERE c.class_id = $1");
        Ok(sqlx::query_as::<_, Class>(&sql)
            .bind(class_id)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_class_by_code(&self, class_code: &str) -> StoreResult<Option<Class>> {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes c WHERE c.class_code = $1");
        Ok(sqlx::query_as::<_, Class>(&sql)
            .bind(class_code)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self, class), fields(class_id = %class.class_id))]
    async fn update_class(&self, class: &Class) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE classes
            SET class_name = $2, subject = $3, semester = $4, max_students = $5,
                description = $6, announcement = $7, status = $8, updated_at = $9
            WHERE class_id = $1
            "#,
        )
        .bind(&class.class_id)
        .bind(&class.class_name)
        .bind(&class.subject)
        .bind(&class.semester)
        .bind(class.max_students)
        .bind(&class.description)
        .bind(&class.announcement)
        .bind(class.status)
        .bind(class.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_teacher_classes(
        &self,
        teacher_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<Class>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes WHERE teacher_id = $1")
            .bind(teacher_id)
            .fetch_one(self.pool())
            .await?;

        let sql = format!(
            "SELECT {CLASS_COLUMNS} FROM classes c WHERE c.teacher_id = $1 \
             ORDER BY c.created_at DESC LIMIT $2 OFFSET $3"
        );
        let classes = sqlx::query_as::<_, Class>(&sql)
            .bind(teacher_id)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((classes, total))
    }

    #[instrument(skip(self))]
    async fn list_student_classes(
        &self,
        student_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<Class>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM class_members WHERE student_id = $1 AND status = $2",
        )
        .bind(student_id)
        .bind(MemberStatus::Active)
        .fetch_one(self.pool())
        .await?;

        let sql = format!(
            "SELECT {CLASS_COLUMNS} FROM classes c \
             JOIN class_members m ON m.class_id = c.class_id \
             WHERE m.student_id = $1 AND m.status = $2 \
             ORDER BY m.join_time DESC LIMIT $3 OFFSET $4"
        );
        let classes = sqlx::query_as::<_, Class>(&sql)
            .bind(student_id)
            .bind(MemberStatus::Active)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((classes, total))
    }

    #[instrument(skip(self))]
    async fn find_member(
        &self,
        class_id: &str,
        student_id: &str,
    ) -> StoreResult<Option<ClassMember>> {
        Ok(sqlx::query_as::<_, ClassMember>(
            r#"
            SELECT class_id, student_id, join_time, status, remark
            FROM class_members
            WHERE class_id = $1 AND student_id = $2
            "#,
        )
        .bind(class_id)
        .bind(student_id)
        .fetch_optional(self.pool())
        .await?)
    }

    #[instrument(skip(self))]
    async fn join_class(
        &self,
        class_id: &str,
        student_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tx = self.pool().begin().await?;

        let capacity = sqlx::query_as::<_, Capacity>(
            "SELECT status, max_students, current_students FROM classes \
             WHERE class_id = $1 FOR UPDATE",
        )
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::Rejected("class not found".into()))?;

        if capacity.status != ClassStatus::Ongoing {
            return Err(StoreError::Rejected("class ended or archived".into()));
        }

        let member_status: Option<MemberStatus> = sqlx::query_scalar(
            "SELECT status FROM class_members WHERE class_id = $1 AND student_id = $2",
        )
        .bind(class_id)
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?;

        if member_status == Some(MemberStatus::Active) {
            return Err(StoreError::Rejected("already joined".into()));
        }
        if capacity.current_students >= capacity.max_students {
            return Err(StoreError::Rejected("class full".into()));
        }

        sqlx::query(
            r#"
            INSERT INTO class_members (class_id, student_id, join_time, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (class_id, student_id)
            DO UPDATE SET status = EXCLUDED.status, join_time = EXCLUDED.join_time
            "#,
        )
        .bind(class_id)
        .bind(student_id)
        .bind(at)
        .bind(MemberStatus::Active)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE classes SET current_students = current_students + 1, updated_at = $2 \
             WHERE class_id = $1",
        )
        .bind(class_id)
        .bind(at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn leave_class(&self, class_id: &str, student_id: &str) -> StoreResult<()> {
        let mut tx = self.pool().begin().await?;

        let left = sqlx::query(
            "UPDATE class_members SET status = $3 \
             WHERE class_id = $1 AND student_id = $2 AND status = $4",
        )
        .bind(class_id)
        .bind(student_id)
        .bind(MemberStatus::Left)
        .bind(MemberStatus::Active)
        .execute(&mut *tx)
        .await?;

        if left.rows_affected() == 0 {
            return Err(StoreError::Rejected("not joined".into()));
        }

        sqlx::query(
            "UPDATE classes SET current_students = GREATEST(current_students - 1, 0), \
             updated_at = NOW() WHERE class_id = $1",
        )
        .bind(class_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_members(
        &self,
        class_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<ClassMemberDetail>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM class_members WHERE class_id = $1 AND status = $2",
        )
        .bind(class_id)
        .bind(MemberStatus::Active)
        .fetch_one(self.pool())
        .await?;

        let members = sqlx::query_as::<_, ClassMemberDetail>(
            r#"
            SELECT s.student_id, s.student_name, s.student_number, s.major, s.grade, m.join_time
            FROM class_members m
            JOIN students s ON s.student_id = m.student_id
            WHERE m.class_id = $1 AND m.status = $2
            ORDER BY m.join_time ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(class_id)
        .bind(MemberStatus::Active)
        .bind(page.page_size())
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;

        Ok((members, total))
    }
}
