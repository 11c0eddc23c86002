mod common;

use axum::Router;
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{
    active_teacher, bootstrap_admin, error_message, get, post_json, register_student,
    register_teacher, send, teacher_login, test_app,
};

async fn create_class(app: &Router, token: &str, body: Value) -> (StatusCode, Value) {
    post_json(app, "/api/classes", Some(token), body).await
}

async fn join(app: &Router, token: &str, code: &str) -> (StatusCode, Value) {
    post_json(app, "/api/classes/join", Some(token), json!({ "class_code": code })).await
}

/// An active teacher with one class; returns `(teacher_token, class)`.
async fn teacher_with_class(app: &Router, admin_token: &str, max_students: i32) -> (String, Value) {
    let (_, token) = active_teacher(app, admin_token, "13700001000", "T9000").await;
    let (status, class) = create_class(
        app,
        &token,
        json!({ "class_name": "Data Structures", "subject": "CS", "max_students": max_students }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create class failed: {class}");
    (token, class)
}

#[tokio::test]
async fn test_active_teacher_creates_class() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001000").await;
    let (teacher_id, token) = active_teacher(&app, &admin_token, "13700001001", "T9001").await;

    let (status, body) = create_class(&app, &token, json!({ "class_name": "Compilers" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["class_id"].as_str().unwrap().starts_with("cls_"));
    assert_eq!(body["teacher_id"], teacher_id);
    assert_eq!(body["max_students"], 100);
    assert_eq!(body["current_students"], 0);
    assert_eq!(body["status"], "ongoing");

    let code = body["class_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
}

#[tokio::test]
async fn test_students_cannot_create_classes() {
    let (app, _) = test_app();
    let (_, token) = register_student(&app, "13800001001", "S9001").await;

    let (status, _) = create_class(&app, &token, json!({ "class_name": "Nope" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pending_teacher_has_no_token_to_create_with() {
    let (app, _) = test_app();
    register_teacher(&app, "13700001002", "T9002").await;

    let (status, _) = teacher_login(&app, "13700001002").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_joins_and_leaves() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001010").await;
    let (teacher_token, class) = teacher_with_class(&app, &admin_token, 30).await;
    let class_id = class["class_id"].as_str().unwrap();
    let code = class["class_code"].as_str().unwrap();
    let (student_id, student_token) = register_student(&app, "13800001010", "S9010").await;

    let (status, body) = join(&app, &student_token, &code.to_ascii_lowercase()).await;
    assert_eq!(status, StatusCode::OK, "join failed: {body}");
    assert_eq!(body["current_students"], 1);

    let (status, body) = join(&app, &student_token, code).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "already joined");

    let (status, body) = get(&app, "/api/classes/mine", Some(&student_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["class_id"], class_id);

    let (status, body) = get(
        &app,
        &format!("/api/classes/{class_id}/members"),
        Some(&teacher_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["student_id"], student_id);
    assert_eq!(body["meta"]["page_size"], 20);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/classes/{class_id}/leave"),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "left class");

    let (_, body) = get(&app, &format!("/api/classes/{class_id}"), Some(&student_token)).await;
    assert_eq!(body["current_students"], 0);

    // leaving twice is rejected; rejoining after leaving is allowed
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/classes/{class_id}/leave"),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = join(&app, &student_token, code).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_join_with_unknown_code() {
    let (app, _) = test_app();
    let (_, token) = register_student(&app, "13800001020", "S9020").await;

    let (status, body) = join(&app, &token, "ZZZZZZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "class not found or code incorrect");
}

#[tokio::test]
async fn test_full_class_rejects_join() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001030").await;
    let (_, class) = teacher_with_class(&app, &admin_token, 1).await;
    let code = class["class_code"].as_str().unwrap();

    let (_, first) = register_student(&app, "13800001030", "S9030").await;
    let (_, second) = register_student(&app, "13800001031", "S9031").await;

    let (status, _) = join(&app, &first, code).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = join(&app, &second, code).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "class full");
}

#[tokio::test]
async fn test_ended_class_rejects_join() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001040").await;
    let (teacher_token, class) = teacher_with_class(&app, &admin_token, 10).await;
    let class_id = class["class_id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/classes/{class_id}"),
        Some(&teacher_token),
        Some(json!({ "status": "ended", "announcement": "See you next term" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ended");
    assert_eq!(body["announcement"], "See you next term");

    let (_, student) = register_student(&app, "13800001040", "S9040").await;
    let (status, body) = join(&app, &student, class["class_code"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "class ended or archived");
}

#[tokio::test]
async fn test_owner_removes_member_and_limits_capacity() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001050").await;
    let (teacher_token, class) = teacher_with_class(&app, &admin_token, 10).await;
    let class_id = class["class_id"].as_str().unwrap();
    let code = class["class_code"].as_str().unwrap();

    let (first_id, first) = register_student(&app, "13800001050", "S9050").await;
    let (_, second) = register_student(&app, "13800001051", "S9051").await;
    join(&app, &first, code).await;
    join(&app, &second, code).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/classes/{class_id}"),
        Some(&teacher_token),
        Some(json!({ "max_students": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "max students cannot be below current enrollment");

    // a student cannot remove classmates
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/classes/{class_id}/members/{first_id}"),
        Some(&second),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/classes/{class_id}/members/{first_id}"),
        Some(&teacher_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "student removed");

    let (_, body) = get(
        &app,
        &format!("/api/classes/{class_id}/members"),
        Some(&teacher_token),
    )
    .await;
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_other_teacher_cannot_manage_class() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001060").await;
    let (_, class) = teacher_with_class(&app, &admin_token, 10).await;
    let (_, other) = active_teacher(&app, &admin_token, "13700001060", "T9060").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/classes/{}", class["class_id"].as_str().unwrap()),
        Some(&other),
        Some(json!({ "class_name": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "only the class owner may manage this class");
}

#[tokio::test]
async fn test_lookup_by_code_and_admin_has_no_classes() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900001070").await;
    let (teacher_token, class) = teacher_with_class(&app, &admin_token, 10).await;
    let code = class["class_code"].as_str().unwrap();

    let (status, body) = get(
        &app,
        &format!("/api/classes/code/{}", code.to_ascii_lowercase()),
        Some(&teacher_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class_id"], class["class_id"]);

    let (status, body) = get(&app, "/api/classes/mine", Some(&teacher_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, _) = get(&app, "/api/classes/mine", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
