#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use fyptrack_api::auth::jwt::{generate_access_token, JwtConfig};
use fyptrack_api::auth::password::hash_password;
use fyptrack_api::config::{ServerConfig, StorageConfig};
use fyptrack_api::router::build_app_router;
use fyptrack_api::state::AppState;
use fyptrack_core::storage::LocalObjectStore;
use fyptrack_db::models::profile::{CreateProfile, Profile};
use fyptrack_db::repositories::ProfileRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";
pub const BASE_URL: &str = "http://localhost:3000";
const BOUNDARY: &str = "fyptrack-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(storage_root: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        default_department: "Computer Science".to_string(),
        jwt: JwtConfig {
            secret: "fyptrack-test-secret".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
        storage: StorageConfig {
            root: storage_root.to_string(),
            public_base_url: BASE_URL.to_string(),
            signing_secret: "fyptrack-test-signing-secret".to_string(),
        },
    }
}

/// The application under test. Keeps the storage directory alive.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    _storage: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// An access token for `profile`, as login would issue it.
    pub fn token_for(&self, profile: &Profile) -> String {
        generate_access_token(profile.id, &profile.role, &self.config.jwt)
            .expect("token generation should succeed")
    }
}

/// Build the full application router, as `main.rs` does, over `pool` and a
/// fresh temporary object store.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let storage = tempfile::tempdir().expect("tempdir");
    let root = storage.path().to_string_lossy().to_string();
    let config = test_config(&root);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(LocalObjectStore::new(
            &config.storage.root,
            &config.storage.public_base_url,
            &config.storage.signing_secret,
        )),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        _storage: storage,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a profile with [`TEST_PASSWORD`].
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    role: &str,
    department: Option<&str>,
) -> Profile {
    let input = CreateProfile {
        name: name.to_string(),
        email: format!("{}@uni.test", name.to_lowercase().replace(' ', ".")),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        department: department.map(str::to_string),
        designation: None,
        roll_number: None,
        year: None,
    };
    ProfileRepo::create(pool, &input)
        .await
        .expect("profile creation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::POST, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        builder(method, uri, token)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, Some(token), body).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    send(
        app,
        builder(method, uri, Some(token))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Turn an absolute URL the API returned into a path the router accepts.
pub fn local_path(url: &str) -> &str {
    url.strip_prefix(BASE_URL).expect("URL should use the test base URL")
}
