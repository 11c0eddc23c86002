use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use rand::Rng;
use tracing::{info, instrument, warn};

use elysia_auth::role::{new_sms_admin_id, new_student_id, new_teacher_id};
use elysia_auth::{IssuedToken, Role, TokenError};
use elysia_cache::{CodeError, SendWindow};
use elysia_core::{AppError, hash_password, verify_password};
use elysia_models::admins::{AdminStatus, AdminUser, DEFAULT_ADMIN_ROLE};
use elysia_models::approvals::TeacherApproval;
use elysia_models::auth::{
    AdminAuthResponse, CodeType, MeResponse, MessageResponse, PhonePasswordLoginRequest,
    SendCodeRequest, SendCodeResponse, SmsCodeRequest, StudentAuthResponse,
    StudentPasswordLoginRequest, StudentSmsRegisterRequest, TeacherAuthResponse,
    TeacherRegisterResponse, VerifyCodeRequest, code_purpose,
};
use elysia_models::ids::new_approval_id;
use elysia_models::students::{Student, StudentStatus};
use elysia_models::teachers::{RegisterTeacherRequest, Teacher, TeacherStatus, VerificationStatus};

use crate::middleware::auth::Identity;
use crate::sms::valid_minutes;
use crate::state::AppState;
use crate::stores::store_error;

/// Password given to admins created through SMS registration.
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";

pub(crate) fn code_error(err: CodeError) -> AppError {
    match err {
        CodeError::Mismatch | CodeError::ExpiredOrMissing => AppError::bad_request(err),
        CodeError::Cache(e) => AppError::internal(e),
    }
}

pub(crate) fn token_error(err: TokenError) -> AppError {
    match err {
        TokenError::Expired
        | TokenError::InvalidSignature
        | TokenError::Revoked
        | TokenError::SubjectMismatch => AppError::unauthorized(err),
        TokenError::Issue(_) | TokenError::Denylist(_) => AppError::internal(err),
    }
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

fn default_student_name(phone: &str) -> String {
    let tail = phone.get(phone.len().saturating_sub(4)..).unwrap_or(phone);
    format!("student_{tail}")
}

fn ensure_teacher_can_log_in(teacher: &Teacher) -> Result<(), AppError> {
    match teacher.verification_status {
        VerificationStatus::Pending | VerificationStatus::Rejected => {
            return Err(AppError::forbidden(anyhow!("account not activated")));
        }
        VerificationStatus::Approved => {}
    }
    match teacher.status {
        TeacherStatus::Active => Ok(()),
        TeacherStatus::Inactive => Err(AppError::forbidden(anyhow!("account not activated"))),
        TeacherStatus::Disabled => Err(AppError::forbidden(anyhow!("account disabled"))),
    }
}

pub struct AuthService;

impl AuthService {
    fn issue(state: &AppState, subject_id: &str) -> Result<IssuedToken, AppError> {
        state.tokens.issue(subject_id).map_err(token_error)
    }

    async fn phone_registered(state: &AppState, role: Role, phone: &str) -> Result<bool, AppError> {
        let registered = match role {
            Role::Student => state
                .students
                .find_student_by_phone(phone)
                .await
                .map_err(store_error)?
                .is_some(),
            Role::Teacher => state
                .teachers
                .find_teacher_by_phone(phone)
                .await
                .map_err(store_error)?
                .is_some(),
            Role::Admin => state
                .admins
                .find_admin_by_phone(phone)
                .await
                .map_err(store_error)?
                .is_some(),
        };
        Ok(registered)
    }

    async fn consume_code(
        state: &AppState,
        phone: &str,
        code: &str,
        role: Role,
        code_type: CodeType,
    ) -> Result<(), AppError> {
        let purpose = code_purpose(role, code_type);
        state
            .codes
            .consume_code(phone, code, &purpose)
            .await
            .map_err(code_error)
    }

    #[instrument(skip(state))]
    pub async fn send_code(
        state: &AppState,
        role: Role,
        dto: SendCodeRequest,
    ) -> Result<SendCodeResponse, AppError> {
        let phone = dto.phone_number.as_str();
        let purpose = code_purpose(role, dto.code_type);
        let config = &state.verification_config;

        let registered = Self::phone_registered(state, role, phone).await?;
        match dto.code_type {
            CodeType::Register if registered => {
                return Err(AppError::bad_request(anyhow!(
                    "phone number already registered"
                )));
            }
            CodeType::Login if !registered => {
                return Err(AppError::bad_request(anyhow!("phone number not registered")));
            }
            _ => {}
        }

        let scope = config.cooldown_key(phone, &purpose);
        let window = state
            .codes
            .check_send_frequency(&scope, Duration::from_secs(config.cooldown_secs))
            .await
            .map_err(AppError::internal)?;
        if let SendWindow::Cooling { wait } = window {
            return Err(AppError::bad_request(anyhow!(
                "sending too frequently, retry in {} seconds",
                wait.as_secs()
            )));
        }

        let code = state
            .sms_config
            .fixed_code
            .clone()
            .unwrap_or_else(generate_code);
        state
            .codes
            .save_code(phone, &purpose, &code, Duration::from_secs(config.code_ttl_secs))
            .await
            .map_err(AppError::internal)?;

        if let Err(err) = state
            .sms
            .send_verification_code(
                phone,
                &code,
                &state.sms_config.template_id,
                valid_minutes(config.code_ttl_secs),
            )
            .await
        {
            if let Err(cleanup) = state.codes.delete_code(phone, &purpose).await {
                warn!(error = %cleanup, "Failed to roll back verification code");
            }
            if let Err(cleanup) = state.codes.release_send_slot(&scope).await {
                warn!(error = %cleanup, "Failed to release send slot");
            }
            return Err(AppError::internal(err));
        }

        info!(%purpose, "Verification code sent");
        Ok(SendCodeResponse {
            message: "verification code sent".to_string(),
            expires_in: config.code_ttl_secs,
        })
    }

    /// Check-only; the code stays valid for the registration or login call.
    #[instrument(skip(state, dto), fields(user_type = %dto.user_type))]
    pub async fn verify_code(
        state: &AppState,
        dto: VerifyCodeRequest,
    ) -> Result<MessageResponse, AppError> {
        let purpose = code_purpose(dto.user_type, dto.code_type);
        state
            .codes
            .verify_code(&dto.phone_number, &dto.code, &purpose)
            .await
            .map_err(code_error)?;
        Ok(MessageResponse::new("verification code is valid"))
    }

    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn register_student(
        state: &AppState,
        dto: StudentSmsRegisterRequest,
    ) -> Result<StudentAuthResponse, AppError> {
        Self::consume_code(
            state,
            &dto.phone_number,
            &dto.code,
            Role::Student,
            CodeType::Register,
        )
        .await?;

        if state
            .students
            .find_student_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "phone number already registered"
            )));
        }
        if state
            .students
            .find_student_by_number(&dto.student_number)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "student number already registered"
            )));
        }

        let now = Utc::now();
        let student = Student {
            student_id: new_student_id(),
            student_name: default_student_name(&dto.phone_number),
            phone_number: dto.phone_number,
            password_hash: Some(hash_password(&dto.password)?),
            student_number: dto.student_number,
            email: None,
            gender: None,
            image_url: None,
            major: "unset".to_string(),
            grade: "unset".to_string(),
            programming_level: "beginner".to_string(),
            interests: Vec::new(),
            learning_tags: Vec::new(),
            learning_progress: serde_json::json!({}),
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state
            .students
            .create_student(&student)
            .await
            .map_err(store_error)?;

        let issued = Self::issue(state, &student.student_id)?;
        info!(student_id = %student.student_id, "Student registered");
        Ok(StudentAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            student,
        })
    }

    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn login_student_sms(
        state: &AppState,
        dto: SmsCodeRequest,
    ) -> Result<StudentAuthResponse, AppError> {
        Self::consume_code(state, &dto.phone_number, &dto.code, Role::Student, CodeType::Login)
            .await?;

        let student = state
            .students
            .find_student_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("phone number not registered")))?;
        if !student.is_active() {
            return Err(AppError::forbidden(anyhow!("account disabled")));
        }

        let issued = Self::issue(state, &student.student_id)?;
        Ok(StudentAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            student,
        })
    }

    #[instrument(skip(state, dto), fields(student_number = %dto.student_number))]
    pub async fn login_student_password(
        state: &AppState,
        dto: StudentPasswordLoginRequest,
    ) -> Result<StudentAuthResponse, AppError> {
        let invalid = || AppError::bad_request(anyhow!("invalid student number or password"));

        let student = state
            .students
            .find_student_by_number(&dto.student_number)
            .await
            .map_err(store_error)?
            .ok_or_else(invalid)?;

        let Some(hash) = student.password_hash.as_deref() else {
            return Err(AppError::bad_request(anyhow!(
                "password not set, use SMS login"
            )));
        };
        if !verify_password(&dto.password, hash)? {
            return Err(invalid());
        }
        if !student.is_active() {
            return Err(AppError::forbidden(anyhow!("account disabled")));
        }

        let issued = Self::issue(state, &student.student_id)?;
        Ok(StudentAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            student,
        })
    }

    #[instrument(skip(state, dto), fields(employee_number = %dto.employee_number))]
    pub async fn register_teacher(
        state: &AppState,
        dto: RegisterTeacherRequest,
    ) -> Result<TeacherRegisterResponse, AppError> {
        if state
            .teachers
            .find_teacher_by_employee_number(&dto.employee_number)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "employee number already registered"
            )));
        }
        if state
            .teachers
            .find_teacher_by_email(&dto.school_email)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "school email already registered"
            )));
        }
        if state
            .teachers
            .find_teacher_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "phone number already registered"
            )));
        }

        let now = Utc::now();
        let teacher = Teacher {
            teacher_id: new_teacher_id(),
            phone_number: dto.phone_number,
            password_hash: Some(hash_password(&dto.password)?),
            teacher_name: dto.real_name,
            employee_number: dto.employee_number,
            school_email: dto.school_email,
            gender: None,
            image_url: None,
            teaching_subjects: dto.teaching_subjects,
            teaching_years: dto.teaching_years.unwrap_or(0),
            department: dto.department,
            title: dto.title,
            verification_status: VerificationStatus::Pending,
            verification_time: None,
            verifier_id: None,
            verification_remark: None,
            status: TeacherStatus::Inactive,
            created_at: now,
            updated_at: now,
        };
        let approval = TeacherApproval {
            approval_id: new_approval_id(),
            teacher_id: teacher.teacher_id.clone(),
            employee_number: teacher.employee_number.clone(),
            school_email: teacher.school_email.clone(),
            teacher_name: teacher.teacher_name.clone(),
            phone_number: teacher.phone_number.clone(),
            department: teacher.department.clone(),
            title: teacher.title.clone(),
            teaching_subjects: teacher.teaching_subjects.clone(),
            teaching_years: teacher.teaching_years,
            apply_remark: dto.apply_remark,
            approval_status: VerificationStatus::Pending,
            approver_id: None,
            approver_name: None,
            approval_remark: None,
            approval_time: None,
            created_at: now,
            updated_at: now,
        };
        state
            .teachers
            .create_teacher(&teacher, &approval)
            .await
            .map_err(store_error)?;

        info!(teacher_id = %teacher.teacher_id, approval_id = %approval.approval_id, "Teacher application submitted");
        Ok(TeacherRegisterResponse {
            message: "registration submitted, waiting for approval".to_string(),
            approval_id: approval.approval_id,
            teacher,
        })
    }

    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn login_teacher_sms(
        state: &AppState,
        dto: SmsCodeRequest,
    ) -> Result<TeacherAuthResponse, AppError> {
        Self::consume_code(state, &dto.phone_number, &dto.code, Role::Teacher, CodeType::Login)
            .await?;

        let teacher = state
            .teachers
            .find_teacher_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("phone number not registered")))?;
        ensure_teacher_can_log_in(&teacher)?;

        let issued = Self::issue(state, &teacher.teacher_id)?;
        Ok(TeacherAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            teacher,
        })
    }

    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn login_teacher_password(
        state: &AppState,
        dto: PhonePasswordLoginRequest,
    ) -> Result<TeacherAuthResponse, AppError> {
        let invalid = || AppError::bad_request(anyhow!("invalid phone number or password"));

        let teacher = state
            .teachers
            .find_teacher_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .ok_or_else(invalid)?;
        let hash = teacher.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(&dto.password, hash)? {
            return Err(invalid());
        }
        ensure_teacher_can_log_in(&teacher)?;

        let issued = Self::issue(state, &teacher.teacher_id)?;
        Ok(TeacherAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            teacher,
        })
    }

    /// Creates a disabled admin with the default password. Another admin has
    /// to enable it before it can use the admin routes.
    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn register_admin(
        state: &AppState,
        dto: SmsCodeRequest,
    ) -> Result<AdminAuthResponse, AppError> {
        Self::consume_code(
            state,
            &dto.phone_number,
            &dto.code,
            Role::Admin,
            CodeType::Register,
        )
        .await?;

        if state
            .admins
            .find_admin_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "phone number already registered"
            )));
        }

        let now = Utc::now();
        let admin = AdminUser {
            admin_id: new_sms_admin_id(),
            username: format!("admin_{}", dto.phone_number),
            email: format!("admin_{}@admin.local", dto.phone_number),
            phone_number: Some(dto.phone_number),
            password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
            real_name: None,
            role: DEFAULT_ADMIN_ROLE.to_string(),
            status: AdminStatus::Disabled,
            last_login_time: None,
            login_fail_count: 0,
            password_update_time: None,
            remark: None,
            created_at: now,
            updated_at: now,
        };
        state
            .admins
            .create_admin(&admin)
            .await
            .map_err(store_error)?;

        let issued = Self::issue(state, &admin.admin_id)?;
        info!(admin_id = %admin.admin_id, "Admin registered (disabled)");
        Ok(AdminAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            admin,
        })
    }

    async fn complete_admin_login(
        state: &AppState,
        mut admin: AdminUser,
    ) -> Result<AdminAuthResponse, AppError> {
        if !admin.is_enabled() {
            return Err(AppError::forbidden(anyhow!("account disabled")));
        }

        let now = Utc::now();
        state
            .admins
            .record_admin_login(&admin.admin_id, now)
            .await
            .map_err(store_error)?;
        admin.last_login_time = Some(now);
        admin.login_fail_count = 0;

        let issued = Self::issue(state, &admin.admin_id)?;
        Ok(AdminAuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            admin,
        })
    }

    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn login_admin_sms(
        state: &AppState,
        dto: SmsCodeRequest,
    ) -> Result<AdminAuthResponse, AppError> {
        Self::consume_code(state, &dto.phone_number, &dto.code, Role::Admin, CodeType::Login)
            .await?;

        let admin = state
            .admins
            .find_admin_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .ok_or_else(|| AppError::bad_request(anyhow!("phone number not registered")))?;

        Self::complete_admin_login(state, admin).await
    }

    #[instrument(skip(state, dto), fields(phone = %dto.phone_number))]
    pub async fn login_admin_password(
        state: &AppState,
        dto: PhonePasswordLoginRequest,
    ) -> Result<AdminAuthResponse, AppError> {
        let invalid = || AppError::bad_request(anyhow!("invalid phone number or password"));

        let admin = state
            .admins
            .find_admin_by_phone(&dto.phone_number)
            .await
            .map_err(store_error)?
            .ok_or_else(invalid)?;

        if !verify_password(&dto.password, &admin.password_hash)? {
            state
                .admins
                .record_admin_login_failure(&admin.admin_id)
                .await
                .map_err(store_error)?;
            warn!(admin_id = %admin.admin_id, "Admin password login failed");
            return Err(invalid());
        }

        Self::complete_admin_login(state, admin).await
    }

    pub fn me(identity: Identity) -> MeResponse {
        MeResponse {
            subject_id: identity.subject_id,
            role: identity.role,
            profile: identity.profile,
        }
    }

    #[instrument(skip(state, identity, token), fields(subject_id = %identity.subject_id))]
    pub async fn logout(
        state: &AppState,
        identity: &Identity,
        token: &str,
    ) -> Result<MessageResponse, AppError> {
        state
            .tokens
            .invalidate(&identity.subject_id, token)
            .await
            .map_err(token_error)?;
        Ok(MessageResponse::new("logged out"))
    }
}
