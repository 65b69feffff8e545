//! Student-to-guide project request model.

use serde::Serialize;
use sqlx::FromRow;
use fyptrack_core::types::{DbId, Timestamp};

use crate::models::project::Project;

/// A row from the `project_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRequest {
    pub id: DbId,
    pub student_id: DbId,
    pub guide_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub student_id: DbId,
    pub guide_id: DbId,
    pub title: String,
    pub description: String,
}

/// Result of approving a request inside one transaction.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovedRequest {
    pub request: ProjectRequest,
    pub project: Project,
}
