use async_trait::async_trait;
use tracing::instrument;

use elysia_models::subjects::{Subject, SubjectQueryParams};

use super::{PgStore, map_write_error};
use crate::stores::{StoreResult, SubjectStore};

const SUBJECT_COLUMNS: &str = "subject_id, subject_name, subject_code, category, description, \
    credits, status, created_at, updated_at";

#[async_trait]
impl SubjectStore for PgStore {
    #[instrument(skip(self, subject), fields(subject_id = %subject.subject_id))]
    async fn create_subject(&self, subject: &Subject) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subjects (
                subject_id, subject_name, subject_code, category, description, credits, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&subject.subject_id)
        .bind(&subject.subject_name)
        .bind(&subject.subject_code)
        .bind(&subject.category)
        .bind(&subject.description)
        .bind(subject.credits)
        .bind(subject.status)
        .bind(subject.created_at)
        .bind(subject.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_subject(&self, subject_id: &str) -> StoreResult<Option<Subject>> {
        let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = $1");
        Ok(sqlx::query_as::<_, Subject>(&sql)
            .bind(subject_id)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_subject_by_code(&self, code: &str) -> StoreResult<Option<Subject>> {
        let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_code = $1");
        Ok(sqlx::query_as::<_, Subject>(&sql)
            .bind(code)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self, subject), fields(subject_id = %subject.subject_id))]
    async fn update_subject(&self, subject: &Subject) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE subjects
            SET subject_name = $2, category = $3, description = $4, credits = $5, status = $6,
                updated_at = $7
            WHERE subject_id = $1
            "#,
        )
        .bind(&subject.subject_id)
        .bind(&subject.subject_name)
        .bind(&subject.category)
        .bind(&subject.description)
        .bind(subject.credits)
        .bind(subject.status)
        .bind(subject.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_subject(&self, subject_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE subject_id = $1")
            .bind(subject_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_subjects(&self, params: &SubjectQueryParams) -> StoreResult<(Vec<Subject>, i64)> {
        let page = params.pagination();
        let filter = r#"
            WHERE ($1::varchar IS NULL OR category = $1)
              AND ($2::smallint IS NULL OR status = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM subjects {filter}"))
            .bind(&params.category)
            .bind(params.status)
            .fetch_one(self.pool())
            .await?;

        let sql = format!(
            "SELECT {SUBJECT_COLUMNS} FROM subjects {filter} \
             ORDER BY subject_code ASC LIMIT $3 OFFSET $4"
        );
        let subjects = sqlx::query_as::<_, Subject>(&sql)
            .bind(&params.category)
            .bind(params.status)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((subjects, total))
    }
}
