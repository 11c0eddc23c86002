//! Authentication models: SMS codes, login and registration payloads, and
//! token responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use elysia_auth::Role;

use crate::admins::AdminUser;
use crate::students::Student;
use crate::teachers::Teacher;
use crate::validators::{validate_phone, validate_sms_code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CodeType {
    Register,
    Login,
}

impl CodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::Register => "register",
            CodeType::Login => "login",
        }
    }
}

/// Cache key purpose for a code, e.g. `student_register`.
pub fn code_purpose(role: Role, code_type: CodeType) -> String {
    format!("{}_{}", role.as_str(), code_type.as_str())
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct SendCodeRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    pub code_type: CodeType,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SendCodeResponse {
    pub message: String,
    /// Seconds until the code expires
    pub expires_in: u64,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct VerifyCodeRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_sms_code"))]
    pub code: String,
    pub user_type: Role,
    pub code_type: CodeType,
}

/// Phone number and SMS code. Used for SMS login and admin SMS registration.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct SmsCodeRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_sms_code"))]
    pub code: String,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct StudentSmsRegisterRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_sms_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 32))]
    pub student_number: String,
    #[validate(length(min = 6, max = 64))]
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct StudentPasswordLoginRequest {
    #[validate(length(min = 1, max = 32))]
    pub student_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct PhonePasswordLoginRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StudentAuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub student: Student,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TeacherAuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub teacher: Teacher,
}

/// Teachers get no token at registration; the account waits for approval.
#[derive(Serialize, Debug, ToSchema)]
pub struct TeacherRegisterResponse {
    pub message: String,
    pub approval_id: String,
    pub teacher: Teacher,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct AdminAuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub admin: AdminUser,
}

/// Profile of the authenticated subject.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(untagged)]
pub enum RoleProfile {
    Student(Student),
    Teacher(Teacher),
    Admin(AdminUser),
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Teacher(_) => Role::Teacher,
            RoleProfile::Admin(_) => Role::Admin,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RoleProfile::Student(s) => &s.student_id,
            RoleProfile::Teacher(t) => &t.teacher_id,
            RoleProfile::Admin(a) => &a.admin_id,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MeResponse {
    pub subject_id: String,
    pub role: Role,
    pub profile: RoleProfile,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
