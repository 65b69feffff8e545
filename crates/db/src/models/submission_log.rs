//! Append-only submissions audit log.

use fyptrack_core::files::FileMetadata;
use fyptrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionLog {
    pub id: DbId,
    pub project_id: DbId,
    pub student_id: DbId,
    pub section_type: String,
    pub action: String,
    pub content: serde_json::Value,
    pub files: Json<Vec<FileMetadata>>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateSubmissionLog {
    pub project_id: DbId,
    pub student_id: DbId,
    pub section_type: String,
    pub action: String,
    pub content: serde_json::Value,
    pub files: Vec<FileMetadata>,
}
