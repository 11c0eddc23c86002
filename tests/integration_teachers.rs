mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{
    TEST_PASSWORD, active_teacher, bootstrap_admin, error_message, get, post_json,
    register_student, register_teacher, send, teacher_login, test_app,
};

#[tokio::test]
async fn test_teacher_registration_is_pending() {
    let (app, _) = test_app();
    let (status, body) = post_json(
        &app,
        "/api/teacher/auth/register",
        None,
        json!({
            "phone_number": "13700000001",
            "password": TEST_PASSWORD,
            "employee_number": "T1001",
            "school_email": "t1001@school.edu",
            "real_name": "Ada Lovelace",
            "department": "Mathematics",
            "title": "Lecturer",
            "teaching_subjects": ["Calculus", "Logic"],
            "teaching_years": 4,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("token").is_none());
    assert!(body["approval_id"].as_str().unwrap().starts_with("APV"));
    assert!(body["teacher"]["teacher_id"].as_str().unwrap().starts_with("tea_"));
    assert_eq!(body["teacher"]["verification_status"], "pending");
    assert_eq!(body["teacher"]["status"], "inactive");
    assert_eq!(body["teacher"]["teaching_years"], 4);
}

#[tokio::test]
async fn test_duplicate_employee_number_is_rejected() {
    let (app, _) = test_app();
    register_teacher(&app, "13700000002", "T1002").await;

    let (status, _) = post_json(
        &app,
        "/api/teacher/auth/register",
        None,
        json!({
            "phone_number": "13700000003",
            "password": TEST_PASSWORD,
            "employee_number": "T1002",
            "school_email": "other@school.edu",
            "real_name": "Someone Else",
            "department": "Physics",
            "teaching_subjects": ["Optics"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pending_teacher_cannot_log_in_until_approved() {
    let (app, state) = test_app();
    let (_, approval_id) = register_teacher(&app, "13700000004", "T1004").await;

    let (status, body) = teacher_login(&app, "13700000004").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "account not activated");

    let (admin_id, admin_token) = bootstrap_admin(&app, &state, "13900000010").await;
    let (status, body) = post_json(
        &app,
        &format!("/api/admin/approvals/{approval_id}/approve"),
        Some(&admin_token),
        json!({ "approved": true, "remark": "documents checked" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval_status"], "approved");
    assert_eq!(body["approver_id"], admin_id);
    assert_eq!(body["approver_name"], "Root");
    assert_eq!(body["approval_remark"], "documents checked");

    let (status, body) = teacher_login(&app, "13700000004").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teacher"]["verification_status"], "approved");
    assert_eq!(body["teacher"]["status"], "active");
}

#[tokio::test]
async fn test_rejected_teacher_stays_locked_out() {
    let (app, state) = test_app();
    let (_, approval_id) = register_teacher(&app, "13700000005", "T1005").await;
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900000011").await;

    let (status, body) = post_json(
        &app,
        &format!("/api/admin/approvals/{approval_id}/approve"),
        Some(&admin_token),
        json!({ "approved": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval_status"], "rejected");

    let (status, _) = teacher_login(&app, "13700000005").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_approval_is_decided_once() {
    let (app, state) = test_app();
    let (_, approval_id) = register_teacher(&app, "13700000006", "T1006").await;
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900000012").await;
    let uri = format!("/api/admin/approvals/{approval_id}/approve");

    let (status, _) = post_json(&app, &uri, Some(&admin_token), json!({ "approved": true })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        post_json(&app, &uri, Some(&admin_token), json!({ "approved": false })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "approval already processed");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/admin/approvals/{approval_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "only pending approvals can be deleted");
}

#[tokio::test]
async fn test_pending_approval_can_be_deleted() {
    let (app, state) = test_app();
    let (teacher_id, approval_id) = register_teacher(&app, "13700000007", "T1007").await;
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900000013").await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/admin/approvals/{approval_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "approval deleted");

    let (status, _) = get(
        &app,
        &format!("/api/admin/approvals/{approval_id}"),
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the teacher row survives, with nothing left to approve
    let (status, body) = post_json(
        &app,
        &format!("/api/admin/teachers/{teacher_id}/verify"),
        Some(&admin_token),
        json!({ "approved": true }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "approval record not found");
}

#[tokio::test]
async fn test_verify_teacher_routes_through_approval() {
    let (app, state) = test_app();
    let (teacher_id, approval_id) = register_teacher(&app, "13700000008", "T1008").await;
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900000014").await;

    let (status, body) = post_json(
        &app,
        &format!("/api/admin/teachers/{teacher_id}/verify"),
        Some(&admin_token),
        json!({ "approved": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teacher_id"], teacher_id);
    assert_eq!(body["status"], "active");

    let (status, body) = get(
        &app,
        &format!("/api/admin/approvals/{approval_id}"),
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval_status"], "approved");
}

#[tokio::test]
async fn test_list_approvals_filters_by_status() {
    let (app, state) = test_app();
    let (_, first) = register_teacher(&app, "13700000009", "T1009").await;
    register_teacher(&app, "13700000010", "T1010").await;
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900000015").await;

    post_json(
        &app,
        &format!("/api/admin/approvals/{first}/approve"),
        Some(&admin_token),
        json!({ "approved": true }),
    )
    .await;

    let (status, body) = get(&app, "/api/admin/approvals?status=pending", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["employee_number"], "T1010");

    let (_, body) = get(&app, "/api/admin/approvals", Some(&admin_token)).await;
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_teacher_reads_own_approval_and_updates_profile() {
    let (app, state) = test_app();
    let (_, admin_token) = bootstrap_admin(&app, &state, "13900000016").await;
    let (teacher_id, token) = active_teacher(&app, &admin_token, "13700000011", "T1011").await;

    let (status, body) = get(
        &app,
        &format!("/api/teachers/{teacher_id}/approval"),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teacher_id"], teacher_id);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/teachers/{teacher_id}"),
        Some(&token),
        Some(json!({ "title": "Professor", "teaching_years": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Professor");
    assert_eq!(body["teaching_years"], 12);
}

#[tokio::test]
async fn test_admin_routes_reject_non_admins() {
    let (app, _) = test_app();
    let (_, token) = register_student(&app, "13800000020", "S2024020").await;

    for uri in ["/api/admin/users", "/api/admin/approvals"] {
        let (status, body) = get(&app, uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(error_message(&body), "admin access required");
    }

    let (status, _) = get(&app, "/api/admin/approvals", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
