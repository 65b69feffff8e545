//! Handlers for the caller's `/notifications`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fyptrack_core::error::CoreError;
use fyptrack_core::types::DbId;
use fyptrack_db::models::notification::Notification;
use fyptrack_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Only the recipient can mark a notification read; anyone else gets 404.
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::mark_read(&state.pool, id, user.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
