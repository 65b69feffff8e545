//! Top-level page routes.
//!
//! `/auth` is the login entry and `/` the role dashboard. Every other path
//! outside `/api` lands on `/`.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppResult, LOGIN_ROUTE};
use crate::handlers::dashboard::build_dashboard;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// What a signed-out client needs to log in or sign up.
#[derive(Debug, Serialize)]
pub struct LoginEntry {
    pub login: &'static str,
    pub register: &'static str,
    pub refresh: &'static str,
}

/// GET /auth
pub async fn auth_page(MaybeAuthUser(user): MaybeAuthUser) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    Json(DataResponse {
        data: LoginEntry {
            login: "/api/v1/auth/login",
            register: "/api/v1/auth/register",
            refresh: "/api/v1/auth/refresh",
        },
    })
    .into_response()
}

/// GET /
pub async fn home_page(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<Response> {
    let Some(user) = user else {
        return Ok(Redirect::to(LOGIN_ROUTE).into_response());
    };
    let view = build_dashboard(&state, &user).await?;
    Ok(Json(DataResponse { data: view }).into_response())
}

/// Unknown paths: JSON 404 under `/api`, otherwise back to `/`.
pub async fn fallback(uri: Uri) -> Response {
    if uri.path() == "/api" || uri.path().starts_with("/api/") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No route for {}", uri.path()),
                "code": "NOT_FOUND",
            })),
        )
            .into_response();
    }
    Redirect::to("/").into_response()
}
