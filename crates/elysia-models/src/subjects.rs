//! Subject catalogue models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum SubjectStatus {
    Disabled = 0,
    Enabled = 1,
}

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Subject {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub status: SubjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,
    #[validate(length(min = 1, max = 32))]
    pub subject_code: String,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 30))]
    pub credits: Option<i32>,
}

#[derive(Deserialize, Debug, Default, Clone, ToSchema, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject_name: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 30))]
    pub credits: Option<i32>,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub category: Option<String>,
    pub status: Option<SubjectStatus>,
}

impl SubjectQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedSubjectsResponse {
    pub data: Vec<Subject>,
    pub meta: PaginationMeta,
}
