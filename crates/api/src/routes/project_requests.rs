//! Route definitions for the guide directory and `/project-requests`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project_requests;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET  /guides                          -> list_guides
/// POST /project-requests                -> create_request (student)
/// POST /project-requests/{id}/approve   -> approve_request (guide)
/// POST /project-requests/{id}/reject    -> reject_request (guide)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/guides", get(project_requests::list_guides))
        .route("/project-requests", post(project_requests::create_request))
        .route(
            "/project-requests/{id}/approve",
            post(project_requests::approve_request),
        )
        .route(
            "/project-requests/{id}/reject",
            post(project_requests::reject_request),
        )
}
