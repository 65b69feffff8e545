//! Integration tests for admin user management, HOD oversight and
//! notifications.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_test_app, create_user, get_auth, multipart_auth, post_auth,
    post_json_auth, Part,
};
use fyptrack_core::roles::{ROLE_ADMIN, ROLE_GUIDE, ROLE_HOD, ROLE_STUDENT};
use fyptrack_db::models::project::CreateProject;
use fyptrack_db::repositories::ProjectRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_and_lists_users(pool: PgPool) {
    let admin = create_user(&pool, "Root Admin", ROLE_ADMIN, None).await;
    let app = build_test_app(pool);
    let token = app.token_for(&admin);

    let response = post_json_auth(
        app.app(),
        "/api/v1/admin/users",
        &token,
        json!({
            "name": "Second Admin",
            "email": "second@uni.test",
            "password": "final-year-2025",
            "role": "admin",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "admin");

    let list = body_json(get_auth(app.app(), "/api/v1/admin/users", &token).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_rejects_unknown_roles(pool: PgPool) {
    let admin = create_user(&pool, "Root Admin", ROLE_ADMIN, None).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.app(),
        "/api/v1/admin/users",
        &app.token_for(&admin),
        json!({
            "name": "Dean",
            "email": "dean@uni.test",
            "password": "final-year-2025",
            "role": "dean",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admins_cannot_manage_users(pool: PgPool) {
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);

    let response = get_auth(app.app(), "/api/v1/admin/users", &app.token_for(&hod)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_dashboard_groups_by_department(pool: PgPool) {
    let admin = create_user(&pool, "Root Admin", ROLE_ADMIN, None).await;
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, Some("Computer Science")).await;
    create_user(&pool, "Meera Nair", ROLE_HOD, Some("Physics")).await;
    ProjectRepo::create(
        &pool,
        &CreateProject {
            title: "Smart Campus".to_string(),
            description: None,
            guide_id: guide.id,
            student_ids: vec![student.id],
            department: Some("Computer Science".to_string()),
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    let response = get_auth(app.app(), "/api/v1/dashboard", &app.token_for(&admin)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let stats = &json["data"]["stats"];
    assert_eq!(json["data"]["role"], "admin");
    assert_eq!(stats["total_users"], 4);
    assert_eq!(stats["total_projects"], 1);
    assert_eq!(stats["active_projects"], 1);
    assert_eq!(stats["total_departments"], 3);
    assert_eq!(stats["departments"]["Computer Science"]["students"], 1);
    assert_eq!(stats["departments"]["Computer Science"]["guides"], 1);
    assert_eq!(stats["departments"]["Computer Science"]["projects"], 1);
    assert_eq!(stats["departments"]["Physics"]["hods"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hod_sees_department_projects_and_marks_notifications_read(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, Some("Computer Science")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            title: "Smart Campus".to_string(),
            description: None,
            guide_id: guide.id,
            student_ids: vec![student.id],
            department: Some("Computer Science".to_string()),
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    multipart_auth(
        app.app(),
        Method::POST,
        &format!("/api/v1/projects/{}/final-report", project.id),
        &app.token_for(&student),
        &[Part::File {
            field: "file",
            name: "report.pdf",
            content_type: "application/pdf",
            bytes: b"%PDF-1.4",
        }],
    )
    .await;

    let hod_token = app.token_for(&hod);
    let dashboard = body_json(get_auth(app.app(), "/api/v1/dashboard", &hod_token).await).await;
    let data = &dashboard["data"];
    assert_eq!(data["role"], "hod");
    assert_eq!(data["stats"]["total_projects"], 1);
    assert_eq!(data["stats"]["students"], 1);
    assert!(data["projects"][0]["final_report_signed_url"].is_string());
    let notification_id = data["notifications"][0]["id"].as_i64().unwrap();

    // Someone else's notification looks missing.
    let stranger = post_auth(
        app.app(),
        &format!("/api/v1/notifications/{notification_id}/read"),
        &app.token_for(&student),
    )
    .await;
    assert_eq!(stranger.status(), StatusCode::NOT_FOUND);

    let read = post_auth(
        app.app(),
        &format!("/api/v1/notifications/{notification_id}/read"),
        &hod_token,
    )
    .await;
    assert_eq!(read.status(), StatusCode::NO_CONTENT);

    let list = body_json(get_auth(app.app(), "/api/v1/notifications", &hod_token).await).await;
    assert_eq!(list["data"][0]["is_read"], true);
}
