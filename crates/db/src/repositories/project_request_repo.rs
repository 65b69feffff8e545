//! Repository for the `project_requests` table.

use fyptrack_core::status::{REQUEST_APPROVED, REQUEST_PENDING, REQUEST_REJECTED};
use fyptrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::Project;
use crate::models::project_request::{ApprovedRequest, CreateProjectRequest, ProjectRequest};
use crate::repositories::project_repo;

const COLUMNS: &str = "id, student_id, guide_id, title, description, status, created_at, updated_at";

pub struct ProjectRequestRepo;

impl ProjectRequestRepo {
    /// Insert a pending request.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectRequest,
    ) -> Result<ProjectRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_requests (student_id, guide_id, title, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(input.student_id)
            .bind(input.guide_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_requests WHERE id = $1");
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<ProjectRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_requests WHERE student_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_guide(
        pool: &PgPool,
        guide_id: DbId,
    ) -> Result<Vec<ProjectRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_requests WHERE guide_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(guide_id)
            .fetch_all(pool)
            .await
    }

    /// Approve a pending request and create its project atomically.
    ///
    /// The project takes the request's title and description, the guide, and
    /// the requesting student as its only member. Returns `None` when the
    /// request is missing or no longer pending; nothing is written then.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        department: &str,
    ) -> Result<Option<ApprovedRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE project_requests SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(id)
            .bind(REQUEST_APPROVED)
            .bind(REQUEST_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO projects (title, description, guide_id, student_ids, department)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            project_repo::COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&request.title)
            .bind(&request.description)
            .bind(request.guide_id)
            .bind(vec![request.student_id])
            .bind(department)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(ApprovedRequest { request, project }))
    }

    /// Reject a pending request. Returns `None` when it is missing or decided.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<Option<ProjectRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE project_requests SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRequest>(&query)
            .bind(id)
            .bind(REQUEST_REJECTED)
            .bind(REQUEST_PENDING)
            .fetch_optional(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM project_requests")
            .fetch_one(pool)
            .await
    }
}
