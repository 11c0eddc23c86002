#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use elysia::elysia_auth::role::new_admin_id;
use elysia::elysia_config::{CooldownScope, JwtConfig, SmsConfig};
use elysia::elysia_core::hash_password;
use elysia::elysia_models::admins::{AdminStatus, AdminUser};
use elysia::router::init_router;
use elysia::sms::{LogSmsSender, SmsError, SmsSender};
use elysia::state::AppState;
use elysia::stores::AdminStore;

pub const TEST_CODE: &str = "123456";
pub const TEST_PASSWORD: &str = "Passw0rd!";

pub fn test_state_with_sms(sms: Arc<dyn SmsSender>) -> AppState {
    let jwt = JwtConfig::new("a-test-secret-that-is-at-least-32-bytes-long", 3600)
        .expect("test jwt config");
    let mut state = AppState::in_memory(jwt, SmsConfig::fixed(TEST_CODE), sms);
    // independent cooldowns so register and login codes can be sent back to back
    state.verification_config.cooldown_scope = CooldownScope::PhoneAndPurpose;
    state
}

pub fn test_state() -> AppState {
    test_state_with_sms(Arc::new(LogSmsSender))
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (init_router(state.clone()), state)
}

/// Gateway that always refuses delivery.
pub struct FailingSmsSender;

#[async_trait]
impl SmsSender for FailingSmsSender {
    async fn send_verification_code(
        &self,
        _phone: &str,
        _code: &str,
        _template_id: &str,
        _valid_minutes: u64,
    ) -> Result<(), SmsError> {
        Err(SmsError::Rejected {
            status: 503,
            body: "gateway down".into(),
        })
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

pub fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}

/// `role` is the URL segment: `student`, `teacher` or `admin`.
pub async fn send_code(app: &Router, role: &str, phone: &str, code_type: &str) -> (StatusCode, Value) {
    post_json(
        app,
        &format!("/api/{role}/auth/send-code"),
        None,
        json!({ "phone_number": phone, "code_type": code_type }),
    )
    .await
}

/// Registers a student over SMS and returns `(student_id, token)`.
pub async fn register_student(app: &Router, phone: &str, student_number: &str) -> (String, String) {
    let (status, _) = send_code(app, "student", phone, "register").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        app,
        "/api/student/auth/register-sms",
        None,
        json!({
            "phone_number": phone,
            "code": TEST_CODE,
            "student_number": student_number,
            "password": TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");

    (
        body["student"]["student_id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Submits a teacher application and returns `(teacher_id, approval_id)`.
pub async fn register_teacher(app: &Router, phone: &str, employee_number: &str) -> (String, String) {
    let (status, body) = post_json(
        app,
        "/api/teacher/auth/register",
        None,
        json!({
            "phone_number": phone,
            "password": TEST_PASSWORD,
            "employee_number": employee_number,
            "school_email": format!("{employee_number}@school.edu"),
            "real_name": "Grace Hopper",
            "department": "Computer Science",
            "teaching_subjects": ["Algorithms"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "teacher register failed: {body}");

    (
        body["teacher"]["teacher_id"].as_str().unwrap().to_string(),
        body["approval_id"].as_str().unwrap().to_string(),
    )
}

pub async fn teacher_login(app: &Router, phone: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/teacher/auth/login-password",
        None,
        json!({ "phone_number": phone, "password": TEST_PASSWORD }),
    )
    .await
}

/// Inserts an enabled admin directly and logs in; returns `(admin_id, token)`.
pub async fn bootstrap_admin(app: &Router, state: &AppState, phone: &str) -> (String, String) {
    let now = Utc::now();
    let admin_id = new_admin_id();
    let admin = AdminUser {
        admin_id: admin_id.clone(),
        username: format!("root{phone}"),
        phone_number: Some(phone.to_string()),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        real_name: Some("Root".into()),
        email: format!("root{phone}@admin.local"),
        role: "super_admin".into(),
        status: AdminStatus::Enabled,
        last_login_time: None,
        login_fail_count: 0,
        password_update_time: None,
        remark: None,
        created_at: now,
        updated_at: now,
    };
    state.admins.create_admin(&admin).await.unwrap();

    let (status, body) = post_json(
        app,
        "/api/admin/auth/login-password",
        None,
        json!({ "phone_number": phone, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    (admin_id, body["token"].as_str().unwrap().to_string())
}

/// Registers, approves and logs in a teacher; returns `(teacher_id, token)`.
pub async fn active_teacher(
    app: &Router,
    admin_token: &str,
    phone: &str,
    employee_number: &str,
) -> (String, String) {
    let (teacher_id, approval_id) = register_teacher(app, phone, employee_number).await;
    let (status, body) = post_json(
        app,
        &format!("/api/admin/approvals/{approval_id}/approve"),
        Some(admin_token),
        json!({ "approved": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve failed: {body}");

    let (status, body) = teacher_login(app, phone).await;
    assert_eq!(status, StatusCode::OK, "teacher login failed: {body}");
    (teacher_id, body["token"].as_str().unwrap().to_string())
}
