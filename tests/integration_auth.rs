mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use elysia::router::init_router;
use serde_json::json;

use common::{
    FailingSmsSender, TEST_CODE, TEST_PASSWORD, error_message, get, post_json, register_student,
    send, send_code, test_app, test_state, test_state_with_sms,
};

#[tokio::test]
async fn test_student_register_returns_token_and_profile() {
    let (app, _) = test_app();
    let (student_id, token) = register_student(&app, "13800000001", "S2024001").await;

    assert!(student_id.starts_with("stu_"));

    let (status, body) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject_id"], student_id);
    assert_eq!(body["role"], "student");
    assert_eq!(body["profile"]["student_name"], "student_0001");
    assert!(body["profile"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_code_rejected_for_registered_phone() {
    let (app, _) = test_app();
    register_student(&app, "13800000001", "S2024001").await;

    let (status, body) = send_code(&app, "student", "13800000001", "register").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("already registered"));
}

#[tokio::test]
async fn test_register_consumes_code() {
    let (app, _) = test_app();
    register_student(&app, "13800000002", "S2024002").await;

    // same code replayed for another student number
    let (status, body) = post_json(
        &app,
        "/api/student/auth/register-sms",
        None,
        json!({
            "phone_number": "13800000002",
            "code": TEST_CODE,
            "student_number": "S2024099",
            "password": TEST_PASSWORD,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "verification code expired or not sent");
}

#[tokio::test]
async fn test_register_with_wrong_code_keeps_code() {
    let (app, _) = test_app();
    let (status, _) = send_code(&app, "student", "13800000003", "register").await;
    assert_eq!(status, StatusCode::OK);

    let register = |code: &'static str| {
        json!({
            "phone_number": "13800000003",
            "code": code,
            "student_number": "S2024003",
            "password": TEST_PASSWORD,
        })
    };

    let (status, body) =
        post_json(&app, "/api/student/auth/register-sms", None, register("000000")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "verification code is incorrect");

    let (status, _) =
        post_json(&app, "/api/student/auth/register-sms", None, register(TEST_CODE)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_send_code_for_unregistered_login_is_rejected() {
    let (app, _) = test_app();
    let (status, body) = send_code(&app, "student", "13800000004", "login").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "phone number not registered");
}

#[tokio::test]
async fn test_send_code_validates_phone() {
    let (app, _) = test_app();
    let (status, _) = send_code(&app, "student", "1380000", "register").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_send_code_cooldown() {
    let (app, _) = test_app();
    let (status, body) = send_code(&app, "student", "13800000005", "register").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expires_in"], 300);

    let (status, body) = send_code(&app, "student", "13800000005", "register").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("sending too frequently, retry in"));
}

#[tokio::test]
async fn test_phone_scoped_cooldown_spans_purposes() {
    let mut state = test_state();
    state.verification_config.cooldown_scope = elysia::elysia_config::CooldownScope::Phone;
    let app = init_router(state);

    let (status, _) = send_code(&app, "student", "13800000006", "register").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send_code(&app, "teacher", "13800000006", "register").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("too frequently"));
}

#[tokio::test]
async fn test_sms_failure_rolls_back_code() {
    let state = test_state_with_sms(Arc::new(FailingSmsSender));
    let app = init_router(state);

    let (status, body) = send_code(&app, "student", "13800000007", "register").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "Internal server error");

    let (status, body) = post_json(
        &app,
        "/api/auth/verify-code",
        None,
        json!({
            "phone_number": "13800000007",
            "code": TEST_CODE,
            "user_type": "student",
            "code_type": "register",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "verification code expired or not sent");
}

#[tokio::test]
async fn test_sms_failure_does_not_start_cooldown() {
    let state = test_state_with_sms(Arc::new(FailingSmsSender));
    let app = init_router(state);

    let (status, _) = send_code(&app, "student", "13800000017", "register").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // the retry reaches the gateway again instead of being rate limited
    let (status, body) = send_code(&app, "student", "13800000017", "register").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!error_message(&body).contains("too frequently"));
}

#[tokio::test]
async fn test_rejected_send_does_not_start_cooldown() {
    let mut state = test_state();
    state.verification_config.cooldown_scope = elysia::elysia_config::CooldownScope::Phone;
    let app = init_router(state);

    let (status, body) = send_code(&app, "student", "13800000018", "login").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "phone number not registered");

    let (status, _) = send_code(&app, "student", "13800000018", "register").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_code_does_not_consume() {
    let (app, _) = test_app();
    send_code(&app, "student", "13800000008", "register").await;

    let verify = json!({
        "phone_number": "13800000008",
        "code": TEST_CODE,
        "user_type": "student",
        "code_type": "register",
    });
    let (status, body) = post_json(&app, "/api/auth/verify-code", None, verify.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "verification code is valid");

    let (status, _) = post_json(&app, "/api/auth/verify-code", None, verify).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_code_is_scoped_by_role() {
    let (app, _) = test_app();
    send_code(&app, "student", "13800000009", "register").await;

    let (status, _) = post_json(
        &app,
        "/api/auth/verify-code",
        None,
        json!({
            "phone_number": "13800000009",
            "code": TEST_CODE,
            "user_type": "teacher",
            "code_type": "register",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_sms_login() {
    let (app, _) = test_app();
    let (student_id, _) = register_student(&app, "13800000010", "S2024010").await;

    let (status, _) = send_code(&app, "student", "13800000010", "login").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app,
        "/api/student/auth/login-sms",
        None,
        json!({ "phone_number": "13800000010", "code": TEST_CODE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["student_id"], student_id);
    assert!(body["expires_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_student_password_login() {
    let (app, _) = test_app();
    register_student(&app, "13800000011", "S2024011").await;

    let (status, body) = post_json(
        &app,
        "/api/student/auth/login-password",
        None,
        json!({ "student_number": "S2024011", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, body) = post_json(
        &app,
        "/api/student/auth/login-password",
        None,
        json!({ "student_number": "S2024011", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid student number or password");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (app, _) = test_app();
    let (_, token) = register_student(&app, "13800000012", "S2024012").await;

    let (status, body) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "logged out");

    let (status, body) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "token revoked");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (app, _) = test_app();

    let (status, body) = get(&app, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&body), "missing or malformed authorization header");

    let (status, _) = get(&app, "/api/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_sms_registration_starts_disabled() {
    let (app, _) = test_app();
    send_code(&app, "admin", "13900000001", "register").await;

    let (status, body) = post_json(
        &app,
        "/api/admin/auth/register-sms",
        None,
        json!({ "phone_number": "13900000001", "code": TEST_CODE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"]["status"], "disabled");
    assert_eq!(body["admin"]["username"], "admin_13900000001");
    assert!(body["admin"]["admin_id"].as_str().unwrap().starts_with("adm_"));
    let token = body["token"].as_str().unwrap().to_string();

    // token resolves, but the admin group stays closed
    let (status, _) = get(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&app, "/api/admin/users", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "admin account disabled");

    let (status, body) = post_json(
        &app,
        "/api/admin/auth/login-password",
        None,
        json!({ "phone_number": "13900000001", "password": "Admin@123" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "account disabled");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let (app, _) = test_app();
    let request = Request::builder()
        .uri("/api/auth/me")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");

    let request = Request::builder()
        .uri("/api/auth/me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
