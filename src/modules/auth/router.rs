use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    get_me, login_admin_password, login_admin_sms, login_student_password, login_student_sms,
    login_teacher_password, login_teacher_sms, logout, register_admin, register_student,
    register_teacher, send_admin_code, send_student_code, send_teacher_code,
};

pub fn init_student_auth_router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(send_student_code))
        .route("/register-sms", post(register_student))
        .route("/login-sms", post(login_student_sms))
        .route("/login-password", post(login_student_password))
}

pub fn init_teacher_auth_router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(send_teacher_code))
        .route("/register", post(register_teacher))
        .route("/login-sms", post(login_teacher_sms))
        .route("/login-password", post(login_teacher_password))
}

pub fn init_admin_auth_router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(send_admin_code))
        .route("/register-sms", post(register_admin))
        .route("/login-sms", post(login_admin_sms))
        .route("/login-password", post(login_admin_password))
}

/// Session routes; mounted behind `require_auth`.
pub fn init_session_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/logout", post(logout))
}
