//! Repositories for `guide_requests` and `hod_invitations`.

use fyptrack_core::status::{INVITATION_PENDING, REQUEST_PENDING};
use fyptrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::collaboration::{
    CreateGuideRequest, CreateHodInvitation, GuideRequest, GuideRequestWithGuide, HodInvitation,
    InvitationWithGuide,
};

const COLUMNS: &str = "id, hod_id, guide_id, message, status, created_at, updated_at";

/// Same columns qualified with the `r` alias, for joins.
const JOINED_COLUMNS: &str =
    "r.id, r.hod_id, r.guide_id, r.message, r.status, r.created_at, r.updated_at, \
     g.name AS guide_name, g.email AS guide_email";

// ---------------------------------------------------------------------------
// Guide requests
// ---------------------------------------------------------------------------

pub struct GuideRequestRepo;

impl GuideRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateGuideRequest,
    ) -> Result<GuideRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO guide_requests (hod_id, guide_id, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuideRequest>(&query)
            .bind(input.hod_id)
            .bind(input.guide_id)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GuideRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guide_requests WHERE id = $1");
        sqlx::query_as::<_, GuideRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Requests addressed to a HOD, with the requesting guide's contact.
    pub async fn list_for_hod(
        pool: &PgPool,
        hod_id: DbId,
    ) -> Result<Vec<GuideRequestWithGuide>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM guide_requests r
             JOIN profiles g ON g.id = r.guide_id
             WHERE r.hod_id = $1
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, GuideRequestWithGuide>(&query)
            .bind(hod_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_guide(
        pool: &PgPool,
        guide_id: DbId,
    ) -> Result<Vec<GuideRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guide_requests WHERE guide_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, GuideRequest>(&query)
            .bind(guide_id)
            .fetch_all(pool)
            .await
    }

    /// Move a pending request to `status`. Returns `None` if it was not pending.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<GuideRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE guide_requests SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuideRequest>(&query)
            .bind(id)
            .bind(status)
            .bind(REQUEST_PENDING)
            .fetch_optional(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// HOD invitations
// ---------------------------------------------------------------------------

pub struct InvitationRepo;

impl InvitationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateHodInvitation,
    ) -> Result<HodInvitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO hod_invitations (hod_id, guide_id, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HodInvitation>(&query)
            .bind(input.hod_id)
            .bind(input.guide_id)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<HodInvitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hod_invitations WHERE id = $1");
        sqlx::query_as::<_, HodInvitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Invitations a HOD sent, with each guide's contact.
    pub async fn list_for_hod(
        pool: &PgPool,
        hod_id: DbId,
    ) -> Result<Vec<InvitationWithGuide>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM hod_invitations r
             JOIN profiles g ON g.id = r.guide_id
             WHERE r.hod_id = $1
             ORDER BY r.created_at DESC"
        );
        sqlx::query_as::<_, InvitationWithGuide>(&query)
            .bind(hod_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_guide(
        pool: &PgPool,
        guide_id: DbId,
    ) -> Result<Vec<HodInvitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hod_invitations WHERE guide_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, HodInvitation>(&query)
            .bind(guide_id)
            .fetch_all(pool)
            .await
    }

    /// Record a guide's answer. Returns `None` if the invitation was not pending.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<HodInvitation>, sqlx::Error> {
        let query = format!(
            "UPDATE hod_invitations SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HodInvitation>(&query)
            .bind(id)
            .bind(status)
            .bind(INVITATION_PENDING)
            .fetch_optional(pool)
            .await
    }
}
