//! Guide requests (guide to HOD) and HOD invitations (HOD to guide).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fyptrack_core::dashboard::matches_guide_search;
use fyptrack_core::error::CoreError;
use fyptrack_core::requests::validate_message;
use fyptrack_core::roles::{ROLE_GUIDE, ROLE_HOD};
use fyptrack_core::status::{
    ensure_pending, parse_invitation_response, RequestDecision, INVITATION_PENDING,
};
use fyptrack_core::types::DbId;
use fyptrack_db::models::collaboration::{
    CreateGuideRequest, CreateHodInvitation, GuideRequest, HodInvitation,
};
use fyptrack_db::models::profile::ProfileResponse;
use fyptrack_db::repositories::{GuideRequestRepo, InvitationRepo, ProfileRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::hod_department;
use crate::middleware::rbac::{RequireGuide, RequireHod};
use crate::response::DataResponse;
use crate::state::AppState;

const SELECT_AND_MESSAGE: &str = "Please select a guide and enter a message";

/// Request body for `POST /guide-requests`.
#[derive(Debug, Deserialize)]
pub struct NewGuideRequest {
    pub hod_id: DbId,
    #[serde(default)]
    pub message: String,
}

/// Request body for `POST /hod/invitations`.
#[derive(Debug, Deserialize)]
pub struct NewInvitation {
    pub guide_id: Option<DbId>,
    #[serde(default)]
    pub message: String,
}

/// Body for deciding or answering: `{ "status": "approved" | "rejected" }`
/// or `{ "status": "accepted" | "declined" }`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct GuideSearchParams {
    pub search: Option<String>,
}

/// POST /api/v1/guide-requests
pub async fn create_guide_request(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Json(input): Json<NewGuideRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GuideRequest>>)> {
    let message = validate_message(&input.message)?;
    ProfileRepo::find_with_role(&state.pool, input.hod_id, ROLE_HOD)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HOD",
            id: input.hod_id,
        }))?;

    let request = GuideRequestRepo::create(
        &state.pool,
        &CreateGuideRequest {
            hod_id: input.hod_id,
            guide_id: guide.user_id,
            message,
        },
    )
    .await?;

    tracing::info!(
        request_id = request.id,
        guide_id = guide.user_id,
        hod_id = input.hod_id,
        "Guide request sent",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// PUT /api/v1/hod/guide-requests/{id}
pub async fn decide_guide_request(
    State(state): State<AppState>,
    RequireHod(hod): RequireHod,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<DataResponse<GuideRequest>>> {
    let decision = RequestDecision::from_status(&input.status)?;

    let request = GuideRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "GuideRequest",
            id,
        }))?;
    if request.hod_id != hod.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This request was sent to another HOD".into(),
        )));
    }
    ensure_pending(&request.status)?;

    let updated = GuideRequestRepo::decide(&state.pool, id, decision.resulting_status())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Request has already been decided".into()))
        })?;

    tracing::info!(
        request_id = id,
        hod_id = hod.user_id,
        status = %updated.status,
        "Guide request decided",
    );
    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/hod/guides?search=
///
/// Guides of the HOD's department whose name or email contains `search`.
pub async fn search_guides(
    State(state): State<AppState>,
    RequireHod(hod): RequireHod,
    Query(params): Query<GuideSearchParams>,
) -> AppResult<Json<DataResponse<Vec<ProfileResponse>>>> {
    let department = hod_department(&state, hod.user_id).await?;
    let query = params.search.unwrap_or_default();

    let guides = ProfileRepo::list_by_role(&state.pool, ROLE_GUIDE, Some(&department))
        .await?
        .into_iter()
        .filter(|g| matches_guide_search(&g.name, &g.email, &query))
        .collect();
    Ok(Json(DataResponse { data: guides }))
}

/// POST /api/v1/hod/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    RequireHod(hod): RequireHod,
    Json(input): Json<NewInvitation>,
) -> AppResult<(StatusCode, Json<DataResponse<HodInvitation>>)> {
    let guide_id = input
        .guide_id
        .ok_or_else(|| AppError::Core(CoreError::Validation(SELECT_AND_MESSAGE.into())))?;
    let message = validate_message(&input.message)?;

    ProfileRepo::find_guide(&state.pool, guide_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Guide",
            id: guide_id,
        }))?;

    let invitation = InvitationRepo::create(
        &state.pool,
        &CreateHodInvitation {
            hod_id: hod.user_id,
            guide_id,
            message,
        },
    )
    .await?;

    tracing::info!(
        invitation_id = invitation.id,
        hod_id = hod.user_id,
        guide_id,
        "Invitation sent",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: invitation })))
}

/// PUT /api/v1/invitations/{id}
pub async fn respond_to_invitation(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<DataResponse<HodInvitation>>> {
    let status = parse_invitation_response(&input.status)?;

    let invitation = InvitationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "HodInvitation",
            id,
        }))?;
    if invitation.guide_id != guide.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This invitation was sent to another guide".into(),
        )));
    }
    if invitation.status != INVITATION_PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invitation has already been {}",
            invitation.status
        ))));
    }

    let updated = InvitationRepo::respond(&state.pool, id, status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Invitation has already been answered".into()))
        })?;

    tracing::info!(invitation_id = id, guide_id = guide.user_id, status, "Invitation answered");
    Ok(Json(DataResponse { data: updated }))
}
