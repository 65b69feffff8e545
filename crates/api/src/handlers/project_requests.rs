//! Handlers for the `/project-requests` resource.
//!
//! A student asks a guide to supervise a project; approving the request
//! creates the project in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fyptrack_core::error::CoreError;
use fyptrack_core::requests::{project_department, validate_project_request};
use fyptrack_core::roles::ROLE_GUIDE;
use fyptrack_core::status::ensure_pending;
use fyptrack_core::types::DbId;
use fyptrack_db::models::profile::ProfileResponse;
use fyptrack_db::models::project_request::{
    ApprovedRequest, CreateProjectRequest, ProjectRequest,
};
use fyptrack_db::repositories::{ProfileRepo, ProjectRequestRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireGuide, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /project-requests`.
#[derive(Debug, Deserialize)]
pub struct NewProjectRequest {
    pub guide_id: Option<DbId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct GuideListParams {
    pub department: Option<String>,
}

fn already_decided() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Request has already been decided".into(),
    ))
}

/// Load a request addressed to the calling guide that is still pending.
async fn load_pending_for_guide(
    state: &AppState,
    guide_id: DbId,
    id: DbId,
) -> AppResult<ProjectRequest> {
    let request = ProjectRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectRequest",
            id,
        }))?;
    if request.guide_id != guide_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This request was sent to another guide".into(),
        )));
    }
    ensure_pending(&request.status)?;
    Ok(request)
}

/// GET /api/v1/guides?department=
///
/// Active guides a request can be addressed to.
pub async fn list_guides(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<GuideListParams>,
) -> AppResult<Json<DataResponse<Vec<ProfileResponse>>>> {
    let department = params
        .department
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let guides = ProfileRepo::list_by_role(&state.pool, ROLE_GUIDE, department).await?;
    Ok(Json(DataResponse { data: guides }))
}

/// POST /api/v1/project-requests
pub async fn create_request(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Json(input): Json<NewProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRequest>>)> {
    let valid = validate_project_request(&input.title, &input.description)?;
    let guide_id = input
        .guide_id
        .ok_or_else(|| AppError::Core(CoreError::Validation("Please fill in all fields".into())))?;

    ProfileRepo::find_guide(&state.pool, guide_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Guide",
            id: guide_id,
        }))?;

    let request = ProjectRequestRepo::create(
        &state.pool,
        &CreateProjectRequest {
            student_id: student.user_id,
            guide_id,
            title: valid.title,
            description: valid.description,
        },
    )
    .await?;

    tracing::info!(
        request_id = request.id,
        student_id = student.user_id,
        guide_id,
        "Project request sent",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// POST /api/v1/project-requests/{id}/approve
///
/// Creates the project in the guide's department.
pub async fn approve_request(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ApprovedRequest>>> {
    load_pending_for_guide(&state, guide.user_id, id).await?;

    let guide_department = ProfileRepo::find_by_id(&state.pool, guide.user_id)
        .await?
        .and_then(|p| p.department);
    let department = project_department(
        guide_department.as_deref(),
        &state.config.default_department,
    );

    let approved = ProjectRequestRepo::approve(&state.pool, id, &department)
        .await?
        .ok_or_else(already_decided)?;

    tracing::info!(
        request_id = id,
        project_id = approved.project.id,
        guide_id = guide.user_id,
        "Project request approved",
    );
    Ok(Json(DataResponse { data: approved }))
}

/// POST /api/v1/project-requests/{id}/reject
pub async fn reject_request(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectRequest>>> {
    load_pending_for_guide(&state, guide.user_id, id).await?;

    let request = ProjectRequestRepo::reject(&state.pool, id)
        .await?
        .ok_or_else(already_decided)?;

    tracing::info!(request_id = id, guide_id = guide.user_id, "Project request rejected");
    Ok(Json(DataResponse { data: request }))
}
