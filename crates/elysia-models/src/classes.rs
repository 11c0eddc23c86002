//! Class and class membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

pub const DEFAULT_MAX_STUDENTS: i32 = 100;
pub const DEFAULT_MEMBERS_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum ClassStatus {
    Ended = 0,
    Ongoing = 1,
    Archived = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum MemberStatus {
    Left = 0,
    Active = 1,
}

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Class {
    pub class_id: String,
    pub class_name: String,
    /// Join code shared with students
    pub class_code: String,
    pub teacher_id: String,
    pub subject: Option<String>,
    pub semester: Option<String>,
    pub max_students: i32,
    pub current_students: i32,
    pub description: Option<String>,
    pub announcement: Option<String>,
    pub status: ClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn is_full(&self) -> bool {
        self.current_students >= self.max_students
    }
}

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct ClassMember {
    pub class_id: String,
    pub student_id: String,
    pub join_time: DateTime<Utc>,
    pub status: MemberStatus,
    pub remark: Option<String>,
}

/// Active member joined with the student's public profile.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct ClassMemberDetail {
    pub student_id: String,
    pub student_name: String,
    pub student_number: String,
    pub major: String,
    pub grade: String,
    pub join_time: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_name: String,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    #[validate(length(max = 50))]
    pub semester: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub max_students: Option<i32>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, ToSchema, Validate)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_name: Option<String>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    #[validate(length(max = 50))]
    pub semester: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub max_students: Option<i32>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 2000))]
    pub announcement: Option<String>,
    pub status: Option<ClassStatus>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct JoinClassRequest {
    #[validate(length(equal = 6))]
    pub class_code: String,
}

impl JoinClassRequest {
    /// Codes are stored uppercase; accept any casing from clients.
    pub fn normalized_code(&self) -> String {
        self.class_code.trim().to_ascii_uppercase()
    }
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
}

impl ClassQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedClassesResponse {
    pub data: Vec<Class>,
    pub meta: PaginationMeta,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedMembersResponse {
    pub data: Vec<ClassMemberDetail>,
    pub meta: PaginationMeta,
}
