//! Repository for the `project_sections` table.
//!
//! At most one row exists per `(project_id, section_type)`; every write that
//! may create a row goes through `ON CONFLICT` on that pair.

use fyptrack_core::section::{SECTION_COMPLETED, SECTION_PENDING, SECTION_SUBMITTED};
use fyptrack_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::section::{ProjectSection, SubmitSection};

const COLUMNS: &str = "id, project_id, section_type, content, files, status, due_date, \
                       feedback, score, submitted_at, created_at, updated_at";

pub struct SectionRepo;

impl SectionRepo {
    /// All sections of the given projects, grouped by project.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectSection>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM project_sections
             WHERE project_id = ANY($1)
             ORDER BY project_id, id"
        );
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_project_and_type(
        pool: &PgPool,
        project_id: DbId,
        section_type: &str,
    ) -> Result<Option<ProjectSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_sections WHERE project_id = $1 AND section_type = $2"
        );
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(project_id)
            .bind(section_type)
            .fetch_optional(pool)
            .await
    }

    /// Store a student submission, creating the row on first submission.
    ///
    /// Content is replaced, new files are appended to the existing list, and
    /// the section moves to `submitted`.
    pub async fn submit(pool: &PgPool, input: &SubmitSection) -> Result<ProjectSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_sections
                (project_id, section_type, content, files, status, submitted_at)
             VALUES ($1, $2, $3, $4, $5, NOW())
             ON CONFLICT ON CONSTRAINT uq_project_sections_project_type DO UPDATE SET
                content = EXCLUDED.content,
                files = project_sections.files || EXCLUDED.files,
                status = EXCLUDED.status,
                submitted_at = EXCLUDED.submitted_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(input.project_id)
            .bind(&input.section_type)
            .bind(&input.content)
            .bind(Json(&input.new_files))
            .bind(SECTION_SUBMITTED)
            .fetch_one(pool)
            .await
    }

    /// Set the due date on existing rows.
    pub async fn set_due_date(
        pool: &PgPool,
        section_ids: &[DbId],
        due_date: Timestamp,
    ) -> Result<Vec<ProjectSection>, sqlx::Error> {
        let query = format!(
            "UPDATE project_sections SET due_date = $2
             WHERE id = ANY($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(section_ids)
            .bind(due_date)
            .fetch_all(pool)
            .await
    }

    /// Give one section type a due date in each listed project.
    ///
    /// Missing rows are created as `pending`; rows that already exist only
    /// have their due date changed. Runs in a single transaction.
    pub async fn upsert_due_date(
        pool: &PgPool,
        project_ids: &[DbId],
        section_type: &str,
        due_date: Timestamp,
    ) -> Result<Vec<ProjectSection>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(project_ids.len());

        let query = format!(
            "INSERT INTO project_sections (project_id, section_type, status, due_date)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_project_sections_project_type
             DO UPDATE SET due_date = EXCLUDED.due_date
             RETURNING {COLUMNS}"
        );

        for &project_id in project_ids {
            let row = sqlx::query_as::<_, ProjectSection>(&query)
                .bind(project_id)
                .bind(section_type)
                .bind(SECTION_PENDING)
                .bind(due_date)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Returns `None` if the row does not exist.
    pub async fn set_feedback(
        pool: &PgPool,
        id: DbId,
        feedback: &str,
    ) -> Result<Option<ProjectSection>, sqlx::Error> {
        let query = format!(
            "UPDATE project_sections SET feedback = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(id)
            .bind(feedback)
            .fetch_optional(pool)
            .await
    }

    /// Returns `None` if the row does not exist.
    pub async fn set_score(
        pool: &PgPool,
        id: DbId,
        score: i32,
    ) -> Result<Option<ProjectSection>, sqlx::Error> {
        let query =
            format!("UPDATE project_sections SET score = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(id)
            .bind(score)
            .fetch_optional(pool)
            .await
    }

    /// Mark a project's section completed. Returns `None` if it does not exist.
    pub async fn mark_completed(
        pool: &PgPool,
        project_id: DbId,
        section_type: &str,
    ) -> Result<Option<ProjectSection>, sqlx::Error> {
        let query = format!(
            "UPDATE project_sections SET status = $3
             WHERE project_id = $1 AND section_type = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectSection>(&query)
            .bind(project_id)
            .bind(section_type)
            .bind(SECTION_COMPLETED)
            .fetch_optional(pool)
            .await
    }
}
