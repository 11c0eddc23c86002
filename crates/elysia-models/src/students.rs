//! Student domain models and DTOs.
//!
//! Students sign up over SMS and can later log in with either an SMS code
//! or their student number and password.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum StudentStatus {
    Disabled = 0,
    Active = 1,
}

/// A student account.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Student {
    pub student_id: String,
    pub phone_number: String,
    /// Absent for accounts that never set a password.
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub student_name: String,
    pub student_number: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub major: String,
    pub grade: String,
    pub programming_level: String,
    pub interests: Vec<String>,
    pub learning_tags: Vec<String>,
    #[schema(value_type = Object)]
    pub learning_progress: serde_json::Value,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}

/// Profile fields a student may change. Only provided fields are updated.
#[derive(Deserialize, Debug, Default, Clone, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub student_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub major: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub grade: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub programming_level: Option<String>,
    #[validate(length(max = 50))]
    pub interests: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub learning_tags: Option<Vec<String>>,
}

/// Replaces the stored learning progress document.
#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateLearningProgressDto {
    #[schema(value_type = Object)]
    pub learning_progress: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateStudentStatusDto {
    pub status: StudentStatus,
}

/// Query parameters for filtering and paginating students.
#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub major: Option<String>,
    pub grade: Option<String>,
    pub programming_level: Option<String>,
}

impl StudentQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let now = Utc::now();
        let student = Student {
            student_id: "stu_1".into(),
            phone_number: "13800000001".into(),
            password_hash: Some("$2b$12$secret".into()),
            student_name: "student_0001".into(),
            student_number: "S001".into(),
            email: None,
            gender: None,
            image_url: None,
            major: "unset".into(),
            grade: "unset".into(),
            programming_level: "beginner".into(),
            interests: vec![],
            learning_tags: vec![],
            learning_progress: serde_json::json!({}),
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&student).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains(r#""status":"active""#));
    }

    #[test]
    fn test_update_dto_validation() {
        let dto = UpdateStudentDto {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = UpdateStudentDto {
            major: Some("Computer Science".into()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_query_pagination_defaults() {
        let params = StudentQueryParams::default();
        assert_eq!(params.pagination().page(), 1);
        assert_eq!(params.pagination().page_size(), 10);
    }
}
