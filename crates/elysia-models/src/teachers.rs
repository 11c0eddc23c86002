//! Teacher domain models and DTOs.
//!
//! Teachers register without an SMS code and stay inactive until an admin
//! approves their application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use elysia_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

use crate::validators::validate_phone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum TeacherStatus {
    Inactive = 0,
    Active = 1,
    Disabled = 2,
}

/// Review state shared by teacher verification and approval records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum VerificationStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Teacher {
    pub teacher_id: String,
    pub phone_number: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub teacher_name: String,
    pub employee_number: String,
    pub school_email: String,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub teaching_subjects: Vec<String>,
    pub teaching_years: i32,
    pub department: String,
    pub title: Option<String>,
    pub verification_status: VerificationStatus,
    pub verification_time: Option<DateTime<Utc>>,
    pub verifier_id: Option<String>,
    pub verification_remark: Option<String>,
    pub status: TeacherStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    /// Approved and active.
    pub fn can_log_in(&self) -> bool {
        self.verification_status == VerificationStatus::Approved
            && self.status == TeacherStatus::Active
    }
}

/// Teacher application submitted at registration.
#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct RegisterTeacherRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(min = 6, max = 64))]
    pub password: String,
    #[validate(length(min = 1, max = 32))]
    pub employee_number: String,
    #[validate(email)]
    pub school_email: String,
    #[validate(length(min = 1, max = 50))]
    pub real_name: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
    #[validate(length(max = 50))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub teaching_subjects: Vec<String>,
    #[validate(range(min = 0, max = 60))]
    pub teaching_years: Option<i32>,
    #[validate(length(max = 500))]
    pub apply_remark: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, ToSchema, Validate)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 50))]
    pub teacher_name: Option<String>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(length(max = 50))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub teaching_subjects: Option<Vec<String>>,
    #[validate(range(min = 0, max = 60))]
    pub teaching_years: Option<i32>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct VerifyTeacherRequest {
    pub approved: bool,
    #[validate(length(max = 500))]
    pub remark: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherQueryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
    pub department: Option<String>,
    pub verification_status: Option<VerificationStatus>,
    pub status: Option<TeacherStatus>,
}

impl TeacherQueryParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterTeacherRequest {
        RegisterTeacherRequest {
            phone_number: "13900000001".into(),
            password: "secret1".into(),
            employee_number: "T1001".into(),
            school_email: "t1001@school.edu".into(),
            real_name: "Ada".into(),
            department: "Computer Science".into(),
            title: None,
            teaching_subjects: vec!["Algorithms".into()],
            teaching_years: Some(5),
            apply_remark: None,
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.phone_number = "123".into();
        assert!(bad.validate().is_err());

        let mut bad = request();
        bad.teaching_subjects.clear();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_status_filter_deserializes_from_query_strings() {
        let params: TeacherQueryParams =
            serde_json::from_str(r#"{"verification_status":"pending","status":"inactive"}"#)
                .unwrap();
        assert_eq!(params.verification_status, Some(VerificationStatus::Pending));
        assert_eq!(params.status, Some(TeacherStatus::Inactive));
    }
}
