//! Integration tests for guide requests to HODs and HOD invitations.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_user, get_auth, post_json_auth, put_json_auth};
use fyptrack_core::roles::{ROLE_GUIDE, ROLE_HOD, ROLE_STUDENT};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Guide requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guide_request_is_decided_once(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.app(),
        "/api/v1/guide-requests",
        &app.token_for(&guide),
        json!({ "hod_id": hod.id, "message": "Requesting a second reviewer slot" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    let request_id = json["data"]["id"].as_i64().unwrap();

    let hod_token = app.token_for(&hod);
    let uri = format!("/api/v1/hod/guide-requests/{request_id}");

    let approved = put_json_auth(app.app(), &uri, &hod_token, json!({ "status": "approved" })).await;
    assert_eq!(approved.status(), StatusCode::OK);
    assert_eq!(body_json(approved).await["data"]["status"], "approved");

    let again = put_json_auth(app.app(), &uri, &hod_token, json!({ "status": "rejected" })).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guide_request_needs_a_message_and_a_real_hod(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);
    let token = app.token_for(&guide);

    let blank = post_json_auth(
        app.app(),
        "/api/v1/guide-requests",
        &token,
        json!({ "hod_id": hod.id, "message": "  " }),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let not_hod = post_json_auth(
        app.app(),
        "/api/v1/guide-requests",
        &token,
        json!({ "hod_id": guide.id, "message": "Hello" }),
    )
    .await;
    assert_eq!(not_hod.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_decision_is_rejected(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);

    let created = body_json(
        post_json_auth(
            app.app(),
            "/api/v1/guide-requests",
            &app.token_for(&guide),
            json!({ "hod_id": hod.id, "message": "Hello" }),
        )
        .await,
    )
    .await;
    let request_id = created["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.app(),
        &format!("/api/v1/hod/guide-requests/{request_id}"),
        &app.token_for(&hod),
        json!({ "status": "maybe" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// HOD guide search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hod_searches_guides_of_own_department(pool: PgPool) {
    create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    create_user(&pool, "Kiran Das", ROLE_GUIDE, Some("Computer Science")).await;
    create_user(&pool, "Ravi Rao", ROLE_GUIDE, Some("Physics")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);
    let token = app.token_for(&hod);

    let all = body_json(get_auth(app.app(), "/api/v1/hod/guides", &token).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let rao = body_json(get_auth(app.app(), "/api/v1/hod/guides?search=RAO", &token).await).await;
    let rao = rao["data"].as_array().unwrap();
    assert_eq!(rao.len(), 1, "Ravi Rao is in another department");
    assert_eq!(rao[0]["name"], "Asha Rao");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_hods_search_guides(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, Some("Computer Science")).await;
    let app = build_test_app(pool);

    let response = get_auth(app.app(), "/api/v1/hod/guides", &app.token_for(&student)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invitation_without_guide_or_message_is_rejected(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);
    let token = app.token_for(&hod);

    let no_guide = post_json_auth(
        app.app(),
        "/api/v1/hod/invitations",
        &token,
        json!({ "message": "Join the review panel" }),
    )
    .await;
    assert_eq!(no_guide.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(no_guide).await["error"],
        "Please select a guide and enter a message"
    );

    let no_message = post_json_auth(
        app.app(),
        "/api/v1/hod/invitations",
        &token,
        json!({ "guide_id": guide.id, "message": "" }),
    )
    .await;
    assert_eq!(no_message.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guide_accepts_invitation_once(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let other = create_user(&pool, "Kiran Das", ROLE_GUIDE, Some("Computer Science")).await;
    let hod = create_user(&pool, "Vikram Iyer", ROLE_HOD, Some("Computer Science")).await;
    let app = build_test_app(pool);

    let created = post_json_auth(
        app.app(),
        "/api/v1/hod/invitations",
        &app.token_for(&hod),
        json!({ "guide_id": guide.id, "message": "Join the review panel" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let invitation_id = body_json(created).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/invitations/{invitation_id}");

    let wrong_guide =
        put_json_auth(app.app(), &uri, &app.token_for(&other), json!({ "status": "accepted" }))
            .await;
    assert_eq!(wrong_guide.status(), StatusCode::FORBIDDEN);

    let token = app.token_for(&guide);
    let accepted = put_json_auth(app.app(), &uri, &token, json!({ "status": "accepted" })).await;
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(body_json(accepted).await["data"]["status"], "accepted");

    let again = put_json_auth(app.app(), &uri, &token, json!({ "status": "declined" })).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let dashboard = body_json(get_auth(app.app(), "/api/v1/dashboard", &app.token_for(&hod)).await)
        .await;
    assert_eq!(dashboard["data"]["role"], "hod");
    assert_eq!(dashboard["data"]["department"], "Computer Science");
    let invitations = dashboard["data"]["invitations"].as_array().unwrap();
    assert_eq!(invitations.len(), 1);
    assert_eq!(invitations[0]["status"], "accepted");
}
