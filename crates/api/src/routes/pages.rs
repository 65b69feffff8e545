//! Root-level page routes (not under `/api/v1`).

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// ```text
/// GET /       -> home_page (dashboard, or redirect to /auth)
/// GET /auth   -> auth_page (login entry, or redirect to /)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home_page))
        .route("/auth", get(pages::auth_page))
}
