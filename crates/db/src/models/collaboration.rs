//! Guide requests (guide to HOD) and HOD invitations (HOD to guide).

use serde::Serialize;
use sqlx::FromRow;
use fyptrack_core::types::{DbId, Timestamp};

/// A row from `guide_requests`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuideRequest {
    pub id: DbId,
    pub hod_id: DbId,
    pub guide_id: DbId,
    pub message: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `hod_invitations`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HodInvitation {
    pub id: DbId,
    pub hod_id: DbId,
    pub guide_id: DbId,
    pub message: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A guide request joined with the guide's name and email.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuideRequestWithGuide {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: GuideRequest,
    pub guide_name: String,
    pub guide_email: String,
}

/// An invitation joined with the invited guide's name and email.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvitationWithGuide {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invitation: HodInvitation,
    pub guide_name: String,
    pub guide_email: String,
}

#[derive(Debug, Clone)]
pub struct CreateGuideRequest {
    pub hod_id: DbId,
    pub guide_id: DbId,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CreateHodInvitation {
    pub hod_id: DbId,
    pub guide_id: DbId,
    pub message: String,
}
