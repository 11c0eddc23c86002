use anyhow::anyhow;
use chrono::Utc;
use tracing::instrument;

use elysia_auth::Role;
use elysia_core::{AppError, PaginationMeta};
use elysia_models::approvals::TeacherApproval;
use elysia_models::teachers::{
    PaginatedTeachersResponse, Teacher, TeacherQueryParams, UpdateTeacherDto,
};

use crate::middleware::auth::Identity;
use crate::state::AppState;
use crate::stores::store_error;

pub struct TeacherService;

impl TeacherService {
    pub(crate) async fn find_or_reject(state: &AppState, teacher_id: &str) -> Result<Teacher, AppError> {
        state
            .teachers
            .find_teacher(teacher_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("teacher not found")))
    }

    #[instrument(skip(state, identity))]
    pub async fn list_teachers(
        state: &AppState,
        identity: &Identity,
        params: TeacherQueryParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        identity.require_any(&[Role::Admin])?;

        let (data, total) = state
            .teachers
            .list_teachers(&params)
            .await
            .map_err(store_error)?;

        Ok(PaginatedTeachersResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination()),
        })
    }

    #[instrument(skip(state))]
    pub async fn get_teacher(state: &AppState, teacher_id: &str) -> Result<Teacher, AppError> {
        Self::find_or_reject(state, teacher_id).await
    }

    /// Profile fields only; status and verification go through approvals.
    #[instrument(skip(state, identity, dto))]
    pub async fn update_teacher(
        state: &AppState,
        identity: &Identity,
        teacher_id: &str,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        identity.require_self_or_admin(teacher_id)?;
        let mut teacher = Self::find_or_reject(state, teacher_id).await?;

        if let Some(name) = dto.teacher_name {
            teacher.teacher_name = name;
        }
        if let Some(gender) = dto.gender {
            teacher.gender = Some(gender);
        }
        if let Some(image_url) = dto.image_url {
            teacher.image_url = Some(image_url);
        }
        if let Some(title) = dto.title {
            teacher.title = Some(title);
        }
        if let Some(department) = dto.department {
            teacher.department = department;
        }
        if let Some(subjects) = dto.teaching_subjects {
            teacher.teaching_subjects = subjects;
        }
        if let Some(years) = dto.teaching_years {
            teacher.teaching_years = years;
        }
        teacher.updated_at = Utc::now();

        state
            .teachers
            .update_teacher(&teacher)
            .await
            .map_err(store_error)?;
        Ok(teacher)
    }

    #[instrument(skip(state, identity))]
    pub async fn get_approval(
        state: &AppState,
        identity: &Identity,
        teacher_id: &str,
    ) -> Result<TeacherApproval, AppError> {
        identity.require_self_or_admin(teacher_id)?;

        state
            .approvals
            .find_approval_by_teacher(teacher_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("approval record not found")))
    }
}
