mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{
    TEST_CODE, TEST_PASSWORD, bootstrap_admin, error_message, get, post_json, send, send_code,
    test_app,
};

fn new_admin(username: &str, phone: &str) -> Value {
    json!({
        "username": username,
        "password": "Str0ng!pass",
        "email": format!("{username}@admin.local"),
        "phone_number": phone,
        "real_name": "Ops",
    })
}

async fn admin_login(app: &axum::Router, phone: &str, password: &str) -> (StatusCode, Value) {
    post_json(
        app,
        "/api/admin/auth/login-password",
        None,
        json!({ "phone_number": phone, "password": password }),
    )
    .await
}

#[tokio::test]
async fn test_create_admin_and_log_in() {
    let (app, state) = test_app();
    let (_, token) = bootstrap_admin(&app, &state, "13900000100").await;

    let (status, body) = post_json(
        &app,
        "/api/admin/users",
        Some(&token),
        new_admin("ops", "13900000101"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["admin_id"].as_str().unwrap().starts_with("admin_"));
    assert_eq!(body["status"], "enabled");
    assert_eq!(body["role"], "admin");
    assert!(body.get("password_hash").is_none());

    let (status, body) = admin_login(&app, "13900000101", "Str0ng!pass").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["admin"]["last_login_time"].is_string());
}

#[tokio::test]
async fn test_create_admin_rejects_duplicates_and_weak_passwords() {
    let (app, state) = test_app();
    let (_, token) = bootstrap_admin(&app, &state, "13900000110").await;

    let (status, _) =
        post_json(&app, "/api/admin/users", Some(&token), new_admin("ops", "13900000111")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        post_json(&app, "/api/admin/users", Some(&token), new_admin("ops", "13900000112")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "username already exists");

    let mut weak = new_admin("ops2", "13900000113");
    weak["password"] = json!("password");
    let (status, _) = post_json(&app, "/api/admin/users", Some(&token), weak).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_and_get_admins() {
    let (app, state) = test_app();
    let (admin_id, token) = bootstrap_admin(&app, &state, "13900000120").await;

    let (status, body) = get(&app, "/api/admin/users", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = get(&app, &format!("/api/admin/users/{admin_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin_id"], admin_id);

    let (status, body) = get(&app, "/api/admin/users/admin_missing", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "admin not found");
}

#[tokio::test]
async fn test_admin_changes_own_password() {
    let (app, state) = test_app();
    let (admin_id, token) = bootstrap_admin(&app, &state, "13900000130").await;
    let uri = format!("/api/admin/users/{admin_id}/password");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "old_password": "not-it", "new_password": "N3w!secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "old password is incorrect");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "old_password": TEST_PASSWORD, "new_password": "N3w!secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "password updated");

    let (status, _) = admin_login(&app, "13900000130", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = admin_login(&app, "13900000130", "N3w!secret").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_cannot_change_another_admins_password() {
    let (app, state) = test_app();
    let (_, token) = bootstrap_admin(&app, &state, "13900000140").await;
    let (other_id, _) = bootstrap_admin(&app, &state, "13900000141").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/admin/users/{other_id}/password"),
        Some(&token),
        Some(json!({ "old_password": TEST_PASSWORD, "new_password": "N3w!secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_enabling_sms_registered_admin() {
    let (app, state) = test_app();
    let (_, token) = bootstrap_admin(&app, &state, "13900000150").await;

    send_code(&app, "admin", "13900000151", "register").await;
    let (status, body) = post_json(
        &app,
        "/api/admin/auth/register-sms",
        None,
        json!({ "phone_number": "13900000151", "code": TEST_CODE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_id = body["admin"]["admin_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/admin/users/{new_id}/status"),
        Some(&token),
        Some(json!({ "status": "enabled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "enabled");

    let (status, _) = admin_login(&app, "13900000151", "Admin@123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_failed_password_login_is_counted() {
    let (app, state) = test_app();
    let (admin_id, token) = bootstrap_admin(&app, &state, "13900000160").await;

    let (status, body) = admin_login(&app, "13900000160", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid phone number or password");

    let (_, body) = get(&app, &format!("/api/admin/users/{admin_id}"), Some(&token)).await;
    assert_eq!(body["login_fail_count"], 1);
}
