use async_trait::async_trait;
use tracing::instrument;

use elysia_models::students::{Student, StudentQueryParams};

use super::{PgStore, map_write_error};
use crate::stores::{StoreResult, StudentStore};

const STUDENT_COLUMNS: &str = "student_id, phone_number, password_hash, student_name, \
    student_number, email, gender, image_url, major, grade, programming_level, interests, \
    learning_tags, learning_progress, status, created_at, updated_at";

impl PgStore {
    async fn fetch_student_by(&self, column: &str, value: &str) -> StoreResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE {column} = $1");
        Ok(sqlx::query_as::<_, Student>(&sql)
            .bind(value)
            .fetch_optional(self.pool())
            .await?)
    }
}

#[async_trait]
impl StudentStore for PgStore {
    #[instrument(skip(self))]
    async fn find_student(&self, student_id: &str) -> StoreResult<Option<Student>> {
        self.fetch_student_by("student_id", student_id).await
    }

    #[instrument(skip(self))]
    async fn find_student_by_phone(&self, phone: &str) -> StoreResult<Option<Student>> {
        self.fetch_student_by("phone_number", phone).await
    }

    #[instrument(skip(self))]
    async fn find_student_by_number(&self, student_number: &str) -> StoreResult<Option<Student>> {
        self.fetch_student_by("student_number", student_number).await
    }

    #[instrument(skip(self, student), fields(student_id = %student.student_id))]
    async fn create_student(&self, student: &Student) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO students (
                student_id, phone_number, password_hash, student_name, student_number, email,
                gender, image_url, major, grade, programming_level, interests, learning_tags,
                learning_progress, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(&student.student_id)
        .bind(&student.phone_number)
        .bind(&student.password_hash)
        .bind(&student.student_name)
        .bind(&student.student_number)
        .bind(&student.email)
        .bind(&student.gender)
        .bind(&student.image_url)
        .bind(&student.major)
        .bind(&student.grade)
        .bind(&student.programming_level)
        .bind(&student.interests)
        .bind(&student.learning_tags)
        .bind(&student.learning_progress)
        .bind(student.status)
        .bind(student.created_at)
        .bind(student.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self, student), fields(student_id = %student.student_id))]
    async fn update_student(&self, student: &Student) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET password_hash = $2, student_name = $3, email = $4, gender = $5, image_url = $6,
                major = $7, grade = $8, programming_level = $9, interests = $10,
                learning_tags = $11, learning_progress = $12, status = $13, updated_at = $14
            WHERE student_id = $1
            "#,
        )
        .bind(&student.student_id)
        .bind(&student.password_hash)
        .bind(&student.student_name)
        .bind(&student.email)
        .bind(&student.gender)
        .bind(&student.image_url)
        .bind(&student.major)
        .bind(&student.grade)
        .bind(&student.programming_level)
        .bind(&student.interests)
        .bind(&student.learning_tags)
        .bind(&student.learning_progress)
        .bind(student.status)
        .bind(student.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_students(&self, params: &StudentQueryParams) -> StoreResult<(Vec<Student>, i64)> {
        let page = params.pagination();
        let filter = r#"
            WHERE ($1::varchar IS NULL OR major = $1)
              AND ($2::varchar IS NULL OR grade = $2)
              AND ($3::varchar IS NULL OR programming_level = $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM students {filter}"))
            .bind(&params.major)
            .bind(&params.grade)
            .bind(&params.programming_level)
            .fetch_one(self.pool())
            .await?;

        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students {filter} \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        );
        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(&params.major)
            .bind(&params.grade)
            .bind(&params.programming_level)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((students, total))
    }
}
