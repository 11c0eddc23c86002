use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument};

use elysia_core::{AppError, PaginationMeta};
use elysia_models::auth::MessageResponse;
use elysia_models::ids::new_subject_id;
use elysia_models::subjects::{
    CreateSubjectRequest, PaginatedSubjectsResponse, Subject, SubjectQueryParams, SubjectStatus,
    UpdateSubjectRequest,
};

use crate::state::AppState;
use crate::stores::store_error;

pub struct SubjectService;

impl SubjectService {
    async fn find_or_reject(state: &AppState, subject_id: &str) -> Result<Subject, AppError> {
        state
            .subjects
            .find_subject(subject_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("subject not found")))
    }

    #[instrument(skip(state, dto), fields(subject_code = %dto.subject_code))]
    pub async fn create_subject(
        state: &AppState,
        dto: CreateSubjectRequest,
    ) -> Result<Subject, AppError> {
        if state
            .subjects
            .find_subject_by_code(&dto.subject_code)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!("subject code already exists")));
        }

        let now = Utc::now();
        let subject = Subject {
            subject_id: new_subject_id(),
            subject_name: dto.subject_name,
            subject_code: dto.subject_code,
            category: dto.category,
            description: dto.description,
            credits: dto.credits,
            status: SubjectStatus::Enabled,
            created_at: now,
            updated_at: now,
        };
        state
            .subjects
            .create_subject(&subject)
            .await
            .map_err(store_error)?;

        info!(subject_id = %subject.subject_id, "Subject created");
        Ok(subject)
    }

    #[instrument(skip(state))]
    pub async fn list_subjects(
        state: &AppState,
        params: SubjectQueryParams,
    ) -> Result<PaginatedSubjectsResponse, AppError> {
        let (data, total) = state
            .subjects
            .list_subjects(&params)
            .await
            .map_err(store_error)?;

        Ok(PaginatedSubjectsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination()),
        })
    }

    #[instrument(skip(state))]
    pub async fn get_subject(state: &AppState, subject_id: &str) -> Result<Subject, AppError> {
        Self::find_or_reject(state, subject_id).await
    }

    #[instrument(skip(state))]
    pub async fn get_subject_by_code(state: &AppState, code: &str) -> Result<Subject, AppError> {
        state
            .subjects
            .find_subject_by_code(code)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("subject not found")))
    }

    #[instrument(skip(state, dto))]
    pub async fn update_subject(
        state: &AppState,
        subject_id: &str,
        dto: UpdateSubjectRequest,
    ) -> Result<Subject, AppError> {
        let mut subject = Self::find_or_reject(state, subject_id).await?;

        if let Some(name) = dto.subject_name {
            subject.subject_name = name;
        }
        if let Some(category) = dto.category {
            subject.category = Some(category);
        }
        if let Some(description) = dto.description {
            subject.description = Some(description);
        }
        if let Some(credits) = dto.credits {
            subject.credits = Some(credits);
        }
        subject.updated_at = Utc::now();

        state
            .subjects
            .update_subject(&subject)
            .await
            .map_err(store_error)?;
        Ok(subject)
    }

    #[instrument(skip(state))]
    pub async fn delete_subject(
        state: &AppState,
        subject_id: &str,
    ) -> Result<MessageResponse, AppError> {
        let deleted = state
            .subjects
            .delete_subject(subject_id)
            .await
            .map_err(store_error)?;
        if !deleted {
            return Err(AppError::bad_request(anyhow!("subject not found")));
        }

        info!(subject_id, "Subject deleted");
        Ok(MessageResponse::new("subject deleted"))
    }

    #[instrument(skip(state))]
    pub async fn set_status(
        state: &AppState,
        subject_id: &str,
        status: SubjectStatus,
    ) -> Result<Subject, AppError> {
        let mut subject = Self::find_or_reject(state, subject_id).await?;
        subject.status = status;
        subject.updated_at = Utc::now();

        state
            .subjects
            .update_subject(&subject)
            .await
            .map_err(store_error)?;
        Ok(subject)
    }
}
