//! Route definitions for guide requests, HOD views and invitations.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::collaboration;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// POST /guide-requests              -> create_guide_request (guide)
/// PUT  /hod/guide-requests/{id}     -> decide_guide_request (HOD)
/// GET  /hod/guides?search=          -> search_guides (HOD)
/// POST /hod/invitations             -> create_invitation (HOD)
/// PUT  /invitations/{id}            -> respond_to_invitation (guide)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/guide-requests", post(collaboration::create_guide_request))
        .route(
            "/hod/guide-requests/{id}",
            put(collaboration::decide_guide_request),
        )
        .route("/hod/guides", get(collaboration::search_guides))
        .route("/hod/invitations", post(collaboration::create_invitation))
        .route(
            "/invitations/{id}",
            put(collaboration::respond_to_invitation),
        )
}
