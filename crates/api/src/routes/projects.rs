//! Route definitions for the `/projects` resource and its sections.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{projects, sections};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /{id}                                -> get_project
/// POST /{id}/complete                       -> complete_project (guide)
/// POST /{id}/final-report                   -> upload_final_report (student)
/// PUT  /{id}/sections/{type}                -> submit_section (student)
/// POST /{id}/sections/{type}/complete       -> complete_section (guide)
/// PUT  /{id}/sections/{type}/due-date       -> set_section_due_date (guide)
/// PUT  /{id}/sections/{type}/feedback       -> set_section_feedback (guide)
/// PUT  /{id}/sections/{type}/score          -> set_section_score (guide)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(projects::get_project))
        .route("/{id}/complete", post(projects::complete_project))
        .route("/{id}/final-report", post(projects::upload_final_report))
        .route("/{id}/sections/{section_type}", put(sections::submit_section))
        .route(
            "/{id}/sections/{section_type}/complete",
            post(sections::complete_section),
        )
        .route(
            "/{id}/sections/{section_type}/due-date",
            put(sections::set_section_due_date),
        )
        .route(
            "/{id}/sections/{section_type}/feedback",
            put(sections::set_section_feedback),
        )
        .route(
            "/{id}/sections/{section_type}/score",
            put(sections::set_section_score),
        )
}
