use axum::routing::put;
use axum::Router;

use crate::handlers::guide;
use crate::state::AppState;

/// Routes mounted at `/guide`. `{identifier}` is a section id or type.
///
/// ```text
/// PUT /sections/{identifier}/due-date   -> set_due_date
/// PUT /sections/{identifier}/feedback   -> set_feedback
/// PUT /sections/{identifier}/score      -> set_score
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sections/{identifier}/due-date", put(guide::set_due_date))
        .route("/sections/{identifier}/feedback", put(guide::set_feedback))
        .route("/sections/{identifier}/score", put(guide::set_score))
}
