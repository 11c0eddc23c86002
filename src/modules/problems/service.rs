use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument};

use elysia_auth::Role;
use elysia_core::{AppError, PaginationMeta};
use elysia_models::auth::MessageResponse;
use elysia_models::problems::{
    CreateProblemRequest, PaginatedProblemsResponse, Problem, ProblemQueryParams,
    UpdateProblemRequest,
};

use crate::middleware::auth::Identity;
use crate::state::AppState;
use crate::stores::store_error;

const AUTHORS: &[Role] = &[Role::Teacher, Role::Admin];

pub struct ProblemService;

impl ProblemService {
    async fn find_or_reject(state: &AppState, id: i64) -> Result<Problem, AppError> {
        state
            .problems
            .find_problem(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("problem not found")))
    }

    async fn ensure_slug_free(state: &AppState, slug: &str) -> Result<(), AppError> {
        if state
            .problems
            .find_problem_by_slug(slug)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!("title slug already exists")));
        }
        Ok(())
    }

    #[instrument(skip(state, identity, dto), fields(title_slug = %dto.title_slug))]
    pub async fn create_problem(
        state: &AppState,
        identity: &Identity,
        dto: CreateProblemRequest,
    ) -> Result<Problem, AppError> {
        identity.require_any(AUTHORS)?;
        Self::ensure_slug_free(state, &dto.title_slug).await?;

        let now = Utc::now();
        let draft = Problem {
            id: 0,
            title: dto.title,
            title_slug: dto.title_slug,
            difficulty: dto.difficulty.unwrap_or_default(),
            tags: dto.tags.unwrap_or_default(),
            description: dto.description,
            explanation: dto.explanation,
            hint: dto.hint,
            constraints: dto.constraints,
            advanced_requirement: dto.advanced_requirement,
            test_cases: dto.test_cases,
            created_at: now,
            updated_at: now,
        };
        let problem = state
            .problems
            .create_problem(&draft)
            .await
            .map_err(store_error)?;

        info!(problem_id = problem.id, "Problem created");
        Ok(problem)
    }

    #[instrument(skip(state))]
    pub async fn list_problems(
        state: &AppState,
        params: ProblemQueryParams,
    ) -> Result<PaginatedProblemsResponse, AppError> {
        let (data, total) = state
            .problems
            .list_problems(&params)
            .await
            .map_err(store_error)?;

        Ok(PaginatedProblemsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination()),
        })
    }

    #[instrument(skip(state))]
    pub async fn get_problem(state: &AppState, id: i64) -> Result<Problem, AppError> {
        Self::find_or_reject(state, id).await
    }

    #[instrument(skip(state, identity, dto))]
    pub async fn update_problem(
        state: &AppState,
        identity: &Identity,
        id: i64,
        dto: UpdateProblemRequest,
    ) -> Result<Problem, AppError> {
        identity.require_any(AUTHORS)?;
        let mut problem = Self::find_or_reject(state, id).await?;

        if let Some(slug) = dto.title_slug
            && slug != problem.title_slug
        {
            Self::ensure_slug_free(state, &slug).await?;
            problem.title_slug = slug;
        }
        if let Some(title) = dto.title {
            problem.title = title;
        }
        if let Some(difficulty) = dto.difficulty {
            problem.difficulty = difficulty;
        }
        if let Some(tags) = dto.tags {
            problem.tags = tags;
        }
        if let Some(description) = dto.description {
            problem.description = description;
        }
        if let Some(explanation) = dto.explanation {
            problem.explanation = Some(explanation);
        }
        if let Some(hint) = dto.hint {
            problem.hint = Some(hint);
        }
        if let Some(constraints) = dto.constraints {
            problem.constraints = Some(constraints);
        }
        if let Some(requirement) = dto.advanced_requirement {
            problem.advanced_requirement = Some(requirement);
        }
        if let Some(test_cases) = dto.test_cases {
            problem.test_cases = test_cases;
        }
        problem.updated_at = Utc::now();

        state
            .problems
            .update_problem(&problem)
            .await
            .map_err(store_error)?;
        Ok(problem)
    }

    #[instrument(skip(state, identity))]
    pub async fn delete_problem(
        state: &AppState,
        identity: &Identity,
        id: i64,
    ) -> Result<MessageResponse, AppError> {
        identity.require_any(AUTHORS)?;
        let deleted = state
            .problems
            .delete_problem(id)
            .await
            .map_err(store_error)?;
        if !deleted {
            return Err(AppError::bad_request(anyhow!("problem not found")));
        }

        info!(problem_id = id, "Problem deleted");
        Ok(MessageResponse::new("problem deleted"))
    }
}
