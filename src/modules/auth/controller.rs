use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use elysia_auth::Role;
use elysia_core::AppError;
use elysia_models::auth::{
    AdminAuthResponse, MeResponse, MessageResponse, PhonePasswordLoginRequest, SendCodeRequest,
    SendCodeResponse, SmsCodeRequest, StudentAuthResponse, StudentPasswordLoginRequest,
    StudentSmsRegisterRequest, TeacherAuthResponse, TeacherRegisterResponse, VerifyCodeRequest,
};
use elysia_models::teachers::RegisterTeacherRequest;

use crate::middleware::auth::{BearerToken, Identity};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/student/auth/send-code",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "Verification code sent", body = SendCodeResponse),
        (status = 400, description = "Cooldown active or phone registration state mismatch"),
        (status = 422, description = "Invalid phone number")
    ),
    tag = "Student Auth"
)]
#[instrument(skip(state))]
pub async fn send_student_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, AppError> {
    Ok(Json(AuthService::send_code(&state, Role::Student, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/student/auth/register-sms",
    request_body = StudentSmsRegisterRequest,
    responses(
        (status = 200, description = "Registered and logged in", body = StudentAuthResponse),
        (status = 400, description = "Bad code or already registered"),
        (status = 422, description = "Validation error")
    ),
    tag = "Student Auth"
)]
#[instrument(skip(state, dto))]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<StudentSmsRegisterRequest>,
) -> Result<Json<StudentAuthResponse>, AppError> {
    Ok(Json(AuthService::register_student(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/student/auth/login-sms",
    request_body = SmsCodeRequest,
    responses(
        (status = 200, description = "Logged in", body = StudentAuthResponse),
        (status = 400, description = "Bad code or unknown phone"),
        (status = 403, description = "Account disabled")
    ),
    tag = "Student Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_student_sms(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SmsCodeRequest>,
) -> Result<Json<StudentAuthResponse>, AppError> {
    Ok(Json(AuthService::login_student_sms(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/student/auth/login-password",
    request_body = StudentPasswordLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = StudentAuthResponse),
        (status = 400, description = "Invalid credentials or password not set"),
        (status = 403, description = "Account disabled")
    ),
    tag = "Student Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_student_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<StudentPasswordLoginRequest>,
) -> Result<Json<StudentAuthResponse>, AppError> {
    Ok(Json(AuthService::login_student_password(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/teacher/auth/send-code",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "Verification code sent", body = SendCodeResponse),
        (status = 400, description = "Cooldown active or phone registration state mismatch")
    ),
    tag = "Teacher Auth"
)]
#[instrument(skip(state))]
pub async fn send_teacher_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, AppError> {
    Ok(Json(AuthService::send_code(&state, Role::Teacher, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/teacher/auth/register",
    request_body = RegisterTeacherRequest,
    responses(
        (status = 201, description = "Application submitted", body = TeacherRegisterResponse),
        (status = 400, description = "Employee number, email or phone already registered"),
        (status = 422, description = "Validation error")
    ),
    tag = "Teacher Auth"
)]
#[instrument(skip(state, dto))]
pub async fn register_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherRegisterResponse>), AppError> {
    let response = AuthService::register_teacher(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/teacher/auth/login-sms",
    request_body = SmsCodeRequest,
    responses(
        (status = 200, description = "Logged in", body = TeacherAuthResponse),
        (status = 400, description = "Bad code or unknown phone"),
        (status = 403, description = "Account not activated or disabled")
    ),
    tag = "Teacher Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_teacher_sms(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SmsCodeRequest>,
) -> Result<Json<TeacherAuthResponse>, AppError> {
    Ok(Json(AuthService::login_teacher_sms(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/teacher/auth/login-password",
    request_body = PhonePasswordLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TeacherAuthResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 403, description = "Account not activated or disabled")
    ),
    tag = "Teacher Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_teacher_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<PhonePasswordLoginRequest>,
) -> Result<Json<TeacherAuthResponse>, AppError> {
    Ok(Json(AuthService::login_teacher_password(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/send-code",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "Verification code sent", body = SendCodeResponse),
        (status = 400, description = "Cooldown active or phone registration state mismatch")
    ),
    tag = "Admin Auth"
)]
#[instrument(skip(state))]
pub async fn send_admin_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, AppError> {
    Ok(Json(AuthService::send_code(&state, Role::Admin, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/register-sms",
    request_body = SmsCodeRequest,
    responses(
        (status = 200, description = "Registered; account starts disabled", body = AdminAuthResponse),
        (status = 400, description = "Bad code or already registered")
    ),
    tag = "Admin Auth"
)]
#[instrument(skip(state, dto))]
pub async fn register_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SmsCodeRequest>,
) -> Result<Json<AdminAuthResponse>, AppError> {
    Ok(Json(AuthService::register_admin(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/login-sms",
    request_body = SmsCodeRequest,
    responses(
        (status = 200, description = "Logged in", body = AdminAuthResponse),
        (status = 400, description = "Bad code or unknown phone"),
        (status = 403, description = "Account disabled")
    ),
    tag = "Admin Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_admin_sms(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SmsCodeRequest>,
) -> Result<Json<AdminAuthResponse>, AppError> {
    Ok(Json(AuthService::login_admin_sms(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/login-password",
    request_body = PhonePasswordLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AdminAuthResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 403, description = "Account disabled")
    ),
    tag = "Admin Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login_admin_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<PhonePasswordLoginRequest>,
) -> Result<Json<AdminAuthResponse>, AppError> {
    Ok(Json(AuthService::login_admin_password(&state, dto).await?))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Code matches", body = MessageResponse),
        (status = 400, description = "Code incorrect, expired or never sent")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn verify_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(AuthService::verify_code(&state, dto).await?))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity and profile", body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(identity), fields(subject_id = %identity.subject_id))]
pub async fn get_me(identity: Identity) -> Json<MeResponse> {
    Json(AuthService::me(identity))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, identity, token))]
pub async fn logout(
    State(state): State<AppState>,
    identity: Identity,
    BearerToken(token): BearerToken,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(AuthService::logout(&state, &identity, &token).await?))
}
