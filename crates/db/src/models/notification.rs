//! In-app notification model.

use serde::Serialize;
use sqlx::FromRow;
use fyptrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub kind: String,
    pub title: String,
    pub message: String,
}
