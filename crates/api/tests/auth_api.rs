//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Covers sign-up, login, account lockout, refresh rotation, logout and the
//! 401 redirect hint.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_user, get, get_auth, post_json, post_json_auth,
    TEST_PASSWORD,
};
use fyptrack_core::roles::{ROLE_GUIDE, ROLE_STUDENT};
use serde_json::json;
use sqlx::PgPool;

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_student_signs_in(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app.app(),
        "/api/v1/auth/register",
        json!({
            "name": "Riya Sen",
            "email": "riya@uni.test",
            "password": "final-year-2025",
            "role": "student",
            "department": "Computer Science",
            "roll_number": "CS-041",
            "year": 4,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["role"], "student");
    assert_eq!(json["user"]["roll_number"], "CS-041");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_as_admin_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app.app(),
        "/api/v1/auth/register",
        json!({
            "name": "Mallory",
            "email": "mallory@uni.test",
            "password": "final-year-2025",
            "role": "admin",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_bad_email_and_short_password(pool: PgPool) {
    let app = build_test_app(pool);

    let bad_email = post_json(
        app.app(),
        "/api/v1/auth/register",
        json!({ "name": "A", "email": "not-an-email", "password": "final-year-2025", "role": "guide" }),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let short = post_json(
        app.app(),
        "/api/v1/auth/register",
        json!({ "name": "A", "email": "a@uni.test", "password": "short", "role": "guide" }),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let json = body_json(short).await;
    assert!(json["error"].as_str().unwrap().contains("at least 8"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_conflicts_case_insensitively(pool: PgPool) {
    create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let app = build_test_app(pool);

    let response = post_json(
        app.app(),
        "/api/v1/auth/register",
        json!({
            "name": "Asha Again",
            "email": "ASHA.RAO@uni.test",
            "password": "final-year-2025",
            "role": "guide",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);

    let response = login(app.app(), &student.email, TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], student.id);
    assert_eq!(json["user"]["email"], student.email);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_returns_401(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);

    let response = login(app.app(), &student.email, "wrong-password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
    assert_eq!(json["redirect"], "/auth");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_email_returns_same_message(pool: PgPool) {
    let app = build_test_app(pool);

    let response = login(app.app(), "ghost@uni.test", TEST_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_locks_after_five_failures(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);

    for _ in 0..5 {
        let response = login(app.app(), &student.email, "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = login(app.app(), &student.email, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("temporarily locked"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_lock_starts_a_fresh_count(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool.clone());

    for _ in 0..5 {
        login(app.app(), &student.email, "wrong-password").await;
    }
    sqlx::query("UPDATE profiles SET locked_until = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(student.id)
        .execute(&pool)
        .await
        .unwrap();

    // One mistake after the lock lapses is not enough to lock again.
    let response = login(app.app(), &student.email, "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (count, locked): (i32, bool) = sqlx::query_as(
        "SELECT failed_login_count, locked_until IS NOT NULL FROM profiles WHERE id = $1",
    )
    .bind(student.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert!(!locked);

    let response = login(app.app(), &student.email, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_the_token(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);

    let first = body_json(login(app.app(), &student.email, TEST_PASSWORD).await).await;
    let old_refresh = first["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.app(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], first["refresh_token"]);

    // The old token was revoked by the rotation.
    let reuse = post_json(
        app.app(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": old_refresh }),
    )
    .await;
    assert_eq!(reuse.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);

    let session = body_json(login(app.app(), &student.email, TEST_PASSWORD).await).await;
    let access = session["access_token"].as_str().unwrap();

    let response = post_json_auth(app.app(), "/api/v1/auth/logout", access, json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let refresh = post_json(
        app.app(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": session["refresh_token"] }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_returns_the_caller(pool: PgPool) {
    let guide = create_user(&pool, "Asha Rao", ROLE_GUIDE, Some("Computer Science")).await;
    let app = build_test_app(pool);
    let token = app.token_for(&guide);

    let response = get_auth(app.app(), "/api/v1/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Asha Rao");
    assert_eq!(json["data"]["department"], "Computer Science");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_points_to_login(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/api/v1/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["redirect"], "/auth");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get_auth(app.app(), "/api/v1/auth/me", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
