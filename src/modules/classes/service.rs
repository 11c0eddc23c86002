use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument, warn};

use elysia_auth::Role;
use elysia_core::{AppError, PaginationMeta, PaginationParams};
use elysia_models::TeacherStatus;
use elysia_models::auth::MessageResponse;
use elysia_models::classes::{
    Class, ClassQueryParams, ClassStatus, CreateClassRequest, DEFAULT_MAX_STUDENTS,
    DEFAULT_MEMBERS_PAGE_SIZE, JoinClassRequest, PaginatedClassesResponse,
    PaginatedMembersResponse, UpdateClassRequest,
};
use elysia_models::ids::{new_class_code, new_class_id};

use crate::middleware::auth::Identity;
use crate::state::AppState;
use crate::stores::{StoreError, store_error};

/// Attempts at drawing an unused join code before giving up.
const CLASS_CODE_ATTEMPTS: usize = 5;

fn class_pagination(params: &ClassQueryParams) -> PaginationParams {
    let params = params.pagination();
    PaginationParams::new(params.page(), params.page_size_or(DEFAULT_MEMBERS_PAGE_SIZE))
}

pub struct ClassService;

impl ClassService {
    async fn find_or_reject(state: &AppState, class_id: &str) -> Result<Class, AppError> {
        state
            .classes
            .find_class(class_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("class not found")))
    }

    async fn find_owned(
        state: &AppState,
        identity: &Identity,
        class_id: &str,
    ) -> Result<Class, AppError> {
        identity.require_any(&[Role::Teacher])?;
        let class = Self::find_or_reject(state, class_id).await?;
        if class.teacher_id != identity.subject_id {
            return Err(AppError::forbidden(anyhow!(
                "only the class owner may manage this class"
            )));
        }
        Ok(class)
    }

    /// Creates a class owned by the calling teacher, who must be active.
    #[instrument(skip(state, identity, dto), fields(teacher_id = %identity.subject_id))]
    pub async fn create_class(
        state: &AppState,
        identity: &Identity,
        dto: CreateClassRequest,
    ) -> Result<Class, AppError> {
        identity.require_any(&[Role::Teacher])?;
        let teacher = state
            .teachers
            .find_teacher(&identity.subject_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("teacher not found")))?;
        if teacher.status != TeacherStatus::Active {
            return Err(AppError::bad_request(anyhow!(
                "teacher account not activated"
            )));
        }

        let now = Utc::now();
        let mut class = Class {
            class_id: new_class_id(),
            class_name: dto.class_name,
            class_code: new_class_code(),
            teacher_id: teacher.teacher_id,
            subject: dto.subject,
            semester: dto.semester,
            max_students: dto.max_students.unwrap_or(DEFAULT_MAX_STUDENTS),
            current_students: 0,
            description: dto.description,
            announcement: None,
            status: ClassStatus::Ongoing,
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=CLASS_CODE_ATTEMPTS {
            match state.classes.create_class(&class).await {
                Ok(()) => {
                    info!(class_id = %class.class_id, class_code = %class.class_code, "Class created");
                    return Ok(class);
                }
                Err(StoreError::Conflict(msg)) if attempt < CLASS_CODE_ATTEMPTS => {
                    warn!(attempt, %msg, "Class code collision, regenerating");
                    class.class_code = new_class_code();
                }
                Err(err) => return Err(store_error(err)),
            }
        }
        Err(AppError::internal(anyhow!("could not allocate a class code")))
    }

    /// Teachers see the classes they own; students see the classes they joined.
    #[instrument(skip(state, identity))]
    pub async fn my_classes(
        state: &AppState,
        identity: &Identity,
        params: ClassQueryParams,
    ) -> Result<PaginatedClassesResponse, AppError> {
        let page = class_pagination(&params);
        let (data, total) = match identity.role {
            Role::Teacher => state
                .classes
                .list_teacher_classes(&identity.subject_id, &page)
                .await
                .map_err(store_error)?,
            Role::Student => state
                .classes
                .list_student_classes(&identity.subject_id, &page)
                .await
                .map_err(store_error)?,
            Role::Admin => {
                return Err(AppError::forbidden(anyhow!(
                    "only teachers and students have classes"
                )));
            }
        };

        Ok(PaginatedClassesResponse {
            data,
            meta: PaginationMeta::new(total, &page),
        })
    }

    #[instrument(skip(state, identity, dto), fields(student_id = %identity.subject_id))]
    pub async fn join_class(
        state: &AppState,
        identity: &Identity,
        dto: JoinClassRequest,
    ) -> Result<Class, AppError> {
        identity.require_any(&[Role::Student])?;
        let code = dto.normalized_code();
        let class = state
            .classes
            .find_class_by_code(&code)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("class not found or code incorrect")))?;

        state
            .classes
            .join_class(&class.class_id, &identity.subject_id, Utc::now())
            .await
            .map_err(store_error)?;

        info!(class_id = %class.class_id, "Student joined class");
        Self::find_or_reject(state, &class.class_id).await
    }

    #[instrument(skip(state))]
    pub async fn get_class(state: &AppState, class_id: &str) -> Result<Class, AppError> {
        Self::find_or_reject(state, class_id).await
    }

    #[instrument(skip(state))]
    pub async fn get_class_by_code(state: &AppState, code: &str) -> Result<Class, AppError> {
        state
            .classes
            .find_class_by_code(&code.trim().to_ascii_uppercase())
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("class not found")))
    }

    #[instrument(skip(state, identity, dto))]
    pub async fn update_class(
        state: &AppState,
        identity: &Identity,
        class_id: &str,
        dto: UpdateClassRequest,
    ) -> Result<Class, AppError> {
        let mut class = Self::find_owned(state, identity, class_id).await?;

        if let Some(name) = dto.class_name {
            class.class_name = name;
        }
        if let Some(subject) = dto.subject {
            class.subject = Some(subject);
        }
        if let Some(semester) = dto.semester {
            class.semester = Some(semester);
        }
        if let Some(max) = dto.max_students {
            if max < class.current_students {
                return Err(AppError::bad_request(anyhow!(
                    "max students cannot be below current enrollment"
                )));
            }
            class.max_students = max;
        }
        if let Some(description) = dto.description {
            class.description = Some(description);
        }
        if let Some(announcement) = dto.announcement {
            class.announcement = Some(announcement);
        }
        if let Some(status) = dto.status {
            class.status = status;
        }
        class.updated_at = Utc::now();

        state
            .classes
            .update_class(&class)
            .await
            .map_err(store_error)?;
        Self::find_or_reject(state, class_id).await
    }

    #[instrument(skip(state, identity), fields(student_id = %identity.subject_id))]
    pub async fn leave_class(
        state: &AppState,
        identity: &Identity,
        class_id: &str,
    ) -> Result<MessageResponse, AppError> {
        identity.require_any(&[Role::Student])?;
        state
            .classes
            .leave_class(class_id, &identity.subject_id)
            .await
            .map_err(store_error)?;

        info!(class_id, "Student left class");
        Ok(MessageResponse::new("left class"))
    }

    #[instrument(skip(state))]
    pub async fn list_members(
        state: &AppState,
        class_id: &str,
        params: ClassQueryParams,
    ) -> Result<PaginatedMembersResponse, AppError> {
        Self::find_or_reject(state, class_id).await?;
        let page = class_pagination(&params);
        let (data, total) = state
            .classes
            .list_members(class_id, &page)
            .await
            .map_err(store_error)?;

        Ok(PaginatedMembersResponse {
            data,
            meta: PaginationMeta::new(total, &page),
        })
    }

    /// Owner removal marks the membership left, same as a voluntary leave.
    #[instrument(skip(state, identity))]
    pub async fn remove_member(
        state: &AppState,
        identity: &Identity,
        class_id: &str,
        student_id: &str,
    ) -> Result<MessageResponse, AppError> {
        Self::find_owned(state, identity, class_id).await?;
        state
            .classes
            .leave_class(class_id, student_id)
            .await
            .map_err(store_error)?;

        info!(class_id, student_id, "Student removed from class");
        Ok(MessageResponse::new("student removed"))
    }
}
