use anyhow::anyhow;
use chrono::Utc;
use tracing::instrument;

use elysia_auth::Role;
use elysia_core::{AppError, PaginationMeta};
use elysia_models::students::{
    PaginatedStudentsResponse, Student, StudentQueryParams, UpdateLearningProgressDto,
    UpdateStudentDto, UpdateStudentStatusDto,
};

use crate::middleware::auth::Identity;
use crate::state::AppState;
use crate::stores::store_error;

pub struct StudentService;

impl StudentService {
    pub(crate) async fn find_or_reject(state: &AppState, student_id: &str) -> Result<Student, AppError> {
        state
            .students
            .find_student(student_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("student not found")))
    }

    #[instrument(skip(state, identity))]
    pub async fn list_students(
        state: &AppState,
        identity: &Identity,
        params: StudentQueryParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        identity.require_any(&[Role::Teacher, Role::Admin])?;

        let (data, total) = state
            .students
            .list_students(&params)
            .await
            .map_err(store_error)?;

        Ok(PaginatedStudentsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination()),
        })
    }

    #[instrument(skip(state))]
    pub async fn get_student(state: &AppState, student_id: &str) -> Result<Student, AppError> {
        Self::find_or_reject(state, student_id).await
    }

    #[instrument(skip(state, identity, dto))]
    pub async fn update_student(
        state: &AppState,
        identity: &Identity,
        student_id: &str,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        identity.require_self_or_admin(student_id)?;
        let mut student = Self::find_or_reject(state, student_id).await?;

        if let Some(name) = dto.student_name {
            student.student_name = name;
        }
        if let Some(email) = dto.email {
            student.email = Some(email);
        }
        if let Some(gender) = dto.gender {
            student.gender = Some(gender);
        }
        if let Some(image_url) = dto.image_url {
            student.image_url = Some(image_url);
        }
        if let Some(major) = dto.major {
            student.major = major;
        }
        if let Some(grade) = dto.grade {
            student.grade = grade;
        }
        if let Some(level) = dto.programming_level {
            student.programming_level = level;
        }
        if let Some(interests) = dto.interests {
            student.interests = interests;
        }
        if let Some(tags) = dto.learning_tags {
            student.learning_tags = tags;
        }
        student.updated_at = Utc::now();

        state
            .students
            .update_student(&student)
            .await
            .map_err(store_error)?;
        Ok(student)
    }

    /// Replaces the whole progress document. Only the student may do this.
    #[instrument(skip(state, identity, dto))]
    pub async fn update_learning_progress(
        state: &AppState,
        identity: &Identity,
        student_id: &str,
        dto: UpdateLearningProgressDto,
    ) -> Result<Student, AppError> {
        if !identity.is_self(student_id) {
            return Err(AppError::forbidden(anyhow!(
                "only the student may update learning progress"
            )));
        }
        let mut student = Self::find_or_reject(state, student_id).await?;

        student.learning_progress = serde_json::Value::Object(dto.learning_progress);
        student.updated_at = Utc::now();

        state
            .students
            .update_student(&student)
            .await
            .map_err(store_error)?;
        Ok(student)
    }

    #[instrument(skip(state, identity))]
    pub async fn update_status(
        state: &AppState,
        identity: &Identity,
        student_id: &str,
        dto: UpdateStudentStatusDto,
    ) -> Result<Student, AppError> {
        identity.require_any(&[Role::Admin])?;
        let mut student = Self::find_or_reject(state, student_id).await?;

        student.status = dto.status;
        student.updated_at = Utc::now();

        state
            .students
            .update_student(&student)
            .await
            .map_err(store_error)?;
        Ok(student)
    }
}
