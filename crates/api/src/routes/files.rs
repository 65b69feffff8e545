//! Route definitions for `/files`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// POST /sign                       -> sign (requires auth)
/// GET  /preview?name=&url=         -> preview (requires auth)
/// GET  /signed/{bucket}/{*path}    -> download_signed
/// GET  /{bucket}/{*path}           -> download_public
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign", post(files::sign))
        .route("/preview", get(files::preview))
        .route("/signed/{bucket}/{*path}", get(files::download_signed))
        .route("/{bucket}/{*path}", get(files::download_public))
}
