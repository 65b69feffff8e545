//! Project model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use fyptrack_core::types::{DbId, Timestamp};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub guide_id: DbId,
    pub student_ids: Vec<DbId>,
    pub department: Option<String>,
    pub status: String,
    pub deadline: Option<Timestamp>,
    /// Object path inside the final-reports bucket.
    pub final_report_url: Option<String>,
    pub final_report_submitted_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn has_student(&self, student_id: DbId) -> bool {
        self.student_ids.contains(&student_id)
    }
}

/// DTO for inserting a project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    pub guide_id: DbId,
    pub student_ids: Vec<DbId>,
    pub department: Option<String>,
}
