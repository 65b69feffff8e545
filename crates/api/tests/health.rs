//! Integration tests for the health check, page routes and general HTTP
//! behaviour.

mod common;

use axum::body::Body;
use axum::http::header::LOCATION;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, create_user, get, get_auth};
use fyptrack_core::roles::ROLE_STUDENT;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn incoming_request_id_is_propagated(pool: PgPool) {
    let app = build_test_app(pool);
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = app.app().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

// ---------------------------------------------------------------------------
// Test: unknown routes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_api_route_returns_json_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.app(), "/api/v1/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_page_redirects_home(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.app(), "/some/old/page").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
}

// ---------------------------------------------------------------------------
// Test: page routes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn home_without_session_redirects_to_login(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app.app(), "/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/auth");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn home_with_session_returns_dashboard(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);
    let response = get_auth(app.app(), "/", &app.token_for(&student)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "student");
    assert_eq!(json["data"]["profile"]["id"], student.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_page_sends_signed_in_users_home(pool: PgPool) {
    let student = create_user(&pool, "Riya Sen", ROLE_STUDENT, None).await;
    let app = build_test_app(pool);

    let signed_out = get(app.app(), "/auth").await;
    assert_eq!(signed_out.status(), StatusCode::OK);
    assert_eq!(
        body_json(signed_out).await["data"]["login"],
        "/api/v1/auth/login"
    );

    let signed_in = get_auth(app.app(), "/auth", &app.token_for(&student)).await;
    assert_eq!(signed_in.status(), StatusCode::SEE_OTHER);
    assert_eq!(signed_in.headers()[LOCATION], "/");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let app = build_test_app(pool);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/dashboard")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PUT")
        .body(Body::empty())
        .unwrap();

    let response = app.app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
