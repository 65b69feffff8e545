//! Project section model and DTOs.

use fyptrack_core::files::FileMetadata;
use fyptrack_core::section::SectionRow;
use fyptrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `project_sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSection {
    pub id: DbId,
    pub project_id: DbId,
    pub section_type: String,
    /// `{"text": ...}` as submitted by the student.
    pub content: serde_json::Value,
    pub files: Json<Vec<FileMetadata>>,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub feedback: Option<String>,
    pub score: Option<i32>,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SectionRow for ProjectSection {
    fn id(&self) -> DbId {
        self.id
    }

    fn project_id(&self) -> DbId {
        self.project_id
    }

    fn section_type(&self) -> &str {
        &self.section_type
    }
}

/// A student's submission for one `(project, section_type)` pair.
#[derive(Debug, Clone)]
pub struct SubmitSection {
    pub project_id: DbId,
    pub section_type: String,
    pub content: serde_json::Value,
    /// Newly uploaded files; appended to whatever the row already holds.
    pub new_files: Vec<FileMetadata>,
}
