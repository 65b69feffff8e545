//! Repository for the append-only `submissions_log` table.

use fyptrack_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::submission_log::{CreateSubmissionLog, SubmissionLog};

const COLUMNS: &str = "id, project_id, student_id, section_type, action, content, files, created_at";

pub struct SubmissionLogRepo;

impl SubmissionLogRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmissionLog,
    ) -> Result<SubmissionLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions_log (project_id, student_id, section_type, action, content, files)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionLog>(&query)
            .bind(input.project_id)
            .bind(input.student_id)
            .bind(&input.section_type)
            .bind(&input.action)
            .bind(&input.content)
            .bind(Json(&input.files))
            .fetch_one(pool)
            .await
    }

    /// A project's submission history, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<SubmissionLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions_log WHERE project_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, SubmissionLog>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
