mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{
    active_teacher, bootstrap_admin, error_message, get, post_json, register_student, send,
    test_app,
};

fn subject(code: &str) -> Value {
    json!({
        "subject_name": "Operating Systems",
        "subject_code": code,
        "category": "core",
        "credits": 4,
    })
}

fn problem(slug: &str) -> Value {
    json!({
        "title": "Two Sum",
        "title_slug": slug,
        "tags": ["array", "hash-table"],
        "description": "Return indices of the two numbers adding up to target.",
        "test_cases": [{ "input": "[2,7,11,15], 9", "output": "[0,1]" }],
    })
}

#[tokio::test]
async fn test_admin_manages_subjects() {
    let (app, state) = test_app();
    let (_, token) = bootstrap_admin(&app, &state, "13900002000").await;

    let (status, body) = post_json(&app, "/api/admin/subjects", Some(&token), subject("CS301")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["subject_id"].as_str().unwrap().starts_with("subj_"));
    assert_eq!(body["status"], "enabled");
    let id = body["subject_id"].as_str().unwrap().to_string();

    let (status, body) = post_json(&app, "/api/admin/subjects", Some(&token), subject("CS301")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "subject code already exists");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/admin/subjects/{id}"),
        Some(&token),
        Some(json!({ "credits": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credits"], 3);
    assert_eq!(body["subject_name"], "Operating Systems");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/admin/subjects/{id}/disable"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "disabled");

    let (_, body) = get(&app, "/api/subjects?status=enabled", Some(&token)).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/admin/subjects/{id}/enable"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "enabled");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/admin/subjects/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "subject deleted");

    let (status, body) = get(&app, &format!("/api/subjects/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "subject not found");
}

#[tokio::test]
async fn test_students_read_but_cannot_manage_subjects() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900002010").await;
    post_json(&app, "/api/admin/subjects", Some(&admin_token), subject("MA101")).await;
    let (_, token) = register_student(&app, "13800002010", "S7010").await;

    let (status, body) = get(&app, "/api/subjects", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = get(&app, "/api/subjects/code/MA101", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject_code"], "MA101");

    let (status, _) = post_json(&app, "/api/admin/subjects", Some(&token), subject("MA102")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_teacher_authors_problems() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900002020").await;
    let (_, token) = active_teacher(&app, &admin_token, "13700002020", "T7020").await;

    let (status, body) = post_json(&app, "/api/problems", Some(&token), problem("two-sum")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["difficulty"], "easy");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = post_json(&app, "/api/problems", Some(&token), problem("two-sum")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "title slug already exists");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/problems/{id}"),
        Some(&token),
        Some(json!({ "difficulty": "medium", "hint": "Use a map" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["difficulty"], "medium");
    assert_eq!(body["hint"], "Use a map");

    let (_, body) = get(&app, "/api/problems?difficulty=medium&tag=array", Some(&token)).await;
    assert_eq!(body["meta"]["total"], 1);
    let (_, body) = get(&app, "/api/problems?difficulty=hard", Some(&token)).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/problems/{id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "problem deleted");

    let (status, _) = get(&app, &format!("/api/problems/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_students_cannot_author_problems() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900002030").await;
    let (status, body) =
        post_json(&app, "/api/problems", Some(&admin_token), problem("reverse-list")).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (_, token) = register_student(&app, "13800002030", "S7030").await;
    let (status, body) = get(&app, &format!("/api/problems/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title_slug"], "reverse-list");

    let (status, _) = post_json(&app, "/api/problems", Some(&token), problem("my-problem")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/problems/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_problem_validation() {
    let (app, state) = test_app();
    let (_, token) = bootstrap_admin(&app, &state, "13900002040").await;

    let mut bad_slug = problem("Two Sum");
    bad_slug["title_slug"] = json!("Two Sum");
    let (status, _) = post_json(&app, "/api/problems", Some(&token), bad_slug).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut no_cases = problem("no-cases");
    no_cases["test_cases"] = json!([]);
    let (status, _) = post_json(&app, "/api/problems", Some(&token), no_cases).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
