//! Repository for the `projects` table.

use fyptrack_core::status::{PROJECT_ACTIVE, PROJECT_COMPLETED};
use fyptrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, title, description, guide_id, student_ids, department, \
                                  status, deadline, final_report_url, final_report_submitted_at, \
                                  completed_at, created_at, updated_at";

/// Queries and state changes for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new active project.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, description, guide_id, student_ids, department)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.guide_id)
            .bind(&input.student_ids)
            .bind(&input.department)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every project, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Projects the student is a member of.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE $1 = ANY(student_ids)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Projects supervised by the guide.
    pub async fn list_for_guide(pool: &PgPool, guide_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE guide_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(guide_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_department(
        pool: &PgPool,
        department: &str,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE department = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(department)
            .fetch_all(pool)
            .await
    }

    /// Ids of the guide's active projects.
    pub async fn active_ids_for_guide(
        pool: &PgPool,
        guide_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM projects WHERE guide_id = $1 AND status = $2 ORDER BY id")
            .bind(guide_id)
            .bind(PROJECT_ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Mark a project completed. Returns `None` if it does not exist.
    pub async fn mark_completed(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $2, completed_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(PROJECT_COMPLETED)
            .fetch_optional(pool)
            .await
    }

    /// Record the storage path of a newly uploaded final report.
    pub async fn set_final_report(
        pool: &PgPool,
        id: DbId,
        object_path: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET final_report_url = $2, final_report_submitted_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(object_path)
            .fetch_optional(pool)
            .await
    }
}
