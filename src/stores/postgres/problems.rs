use async_trait::async_trait;
use tracing::instrument;

use elysia_models::problems::{Problem, ProblemQueryParams};

use super::{PgStore, map_write_error};
use crate::stores::{ProblemStore, StoreResult};

const PROBLEM_COLUMNS: &str = "id, title, title_slug, difficulty, tags, description, explanation, \
    hint, constraints, advanced_requirement, test_cases, created_at, updated_at";

#[async_trait]
impl ProblemStore for PgStore {
    #[instrument(skip(self, problem), fields(title_slug = %problem.title_slug))]
    async fn create_problem(&self, problem: &Problem) -> StoreResult<Problem> {
        let sql = format!(
            r#"
            INSERT INTO problems (
                title, title_slug, difficulty, tags, description, explanation, hint,
                constraints, advanced_requirement, test_cases, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROBLEM_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Problem>(&sql)
            .bind(&problem.title)
            .bind(&problem.title_slug)
            .bind(problem.difficulty)
            .bind(&problem.tags)
            .bind(&problem.description)
            .bind(&problem.explanation)
            .bind(&problem.hint)
            .bind(&problem.constraints)
            .bind(&problem.advanced_requirement)
            .bind(&problem.test_cases)
            .bind(problem.created_at)
            .bind(problem.updated_at)
            .fetch_one(self.pool())
            .await
            .map_err(map_write_error)?;

        Ok(created)
    }

    #[instrument(skip(self))]
    async fn find_problem(&self, id: i64) -> StoreResult<Option<Problem>> {
        let sql = format!("SELECT {PROBLEM_COLUMNS} FROM problems WHERE id = $1");
        Ok(sqlx::query_as::<_, Problem>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_problem_by_slug(&self, slug: &str) -> StoreResult<Option<Problem>> {
        let sql = format!("SELECT {PROBLEM_COLUMNS} FROM problems WHERE title_slug = $1");
        Ok(sqlx::query_as::<_, Problem>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await?)
    }

    #[instrument(skip(self, problem), fields(problem_id = problem.id))]
    async fn update_problem(&self, problem: &Problem) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE problems
            SET title = $2, title_slug = $3, difficulty = $4, tags = $5, description = $6,
                explanation = $7, hint = $8, constraints = $9, advanced_requirement = $10,
                test_cases = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(problem.id)
        .bind(&problem.title)
        .bind(&problem.title_slug)
        .bind(problem.difficulty)
        .bind(&problem.tags)
        .bind(&problem.description)
        .bind(&problem.explanation)
        .bind(&problem.hint)
        .bind(&problem.constraints)
        .bind(&problem.advanced_requirement)
        .bind(&problem.test_cases)
        .bind(problem.updated_at)
        .execute(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_problem(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM problems WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_problems(&self, params: &ProblemQueryParams) -> StoreResult<(Vec<Problem>, i64)> {
        let page = params.pagination();
        let filter = r#"
            WHERE ($1::problem_difficulty IS NULL OR difficulty = $1)
              AND ($2::varchar IS NULL OR $2 = ANY(tags))
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM problems {filter}"))
            .bind(params.difficulty)
            .bind(&params.tag)
            .fetch_one(self.pool())
            .await?;

        let sql = format!(
            "SELECT {PROBLEM_COLUMNS} FROM problems {filter} ORDER BY id ASC LIMIT $3 OFFSET $4"
        );
        let problems = sqlx::query_as::<_, Problem>(&sql)
            .bind(params.difficulty)
            .bind(&params.tag)
            .bind(page.page_size())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok((problems, total))
    }
}
