mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{
    TEST_PASSWORD, bootstrap_admin, error_message, get, post_json, register_student, send,
    test_app,
};

#[tokio::test]
async fn test_student_updates_own_profile() {
    let (app, _) = test_app();
    let (student_id, token) = register_student(&app, "13800003001", "S3001").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{student_id}"),
        Some(&token),
        Some(json!({ "student_name": "Linus", "major": "CS", "interests": ["kernels"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_name"], "Linus");
    assert_eq!(body["major"], "CS");
    assert_eq!(body["interests"][0], "kernels");
}

#[tokio::test]
async fn test_student_cannot_edit_someone_else() {
    let (app, _) = test_app();
    let (first_id, _) = register_student(&app, "13800003002", "S3002").await;
    let (_, other) = register_student(&app, "13800003003", "S3003").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{first_id}"),
        Some(&other),
        Some(json!({ "student_name": "Mallory" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_learning_progress_is_replaced() {
    let (app, _) = test_app();
    let (student_id, token) = register_student(&app, "13800003004", "S3004").await;
    let uri = format!("/api/students/{student_id}/progress");

    send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "learning_progress": { "arrays": 80, "graphs": 10 } })),
    )
    .await;
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "learning_progress": { "trees": 50 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["learning_progress"], json!({ "trees": 50 }));
}

#[tokio::test]
async fn test_listing_students_needs_staff() {
    let (app, state) = test_app();
    let (_, token) = register_student(&app, "13800003005", "S3005").await;

    let (status, _) = get(&app, "/api/students", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, admin_token) = bootstrap_admin(&app, &state, "13900003005").await;
    let (status, body) = get(&app, "/api/students?page=1&page_size=5", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["page_size"], 5);
}

#[tokio::test]
async fn test_disabled_student_is_locked_out() {
    let (app, state) = test_app();
    let (student_id, _) = register_student(&app, "13800003006", "S3006").await;
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900003006").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/students/{student_id}/status"),
        Some(&admin_token),
        Some(json!({ "status": "disabled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "disabled");

    let (status, body) = post_json(
        &app,
        "/api/student/auth/login-password",
        None,
        json!({ "student_number": "S3006", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "account disabled");
}
