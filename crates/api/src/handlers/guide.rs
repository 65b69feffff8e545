//! Handlers for `/guide/sections/{identifier}`.
//!
//! The identifier is either a section row id or a section type name and is
//! resolved against every section of the calling guide's projects.

use axum::extract::{Path, State};
use axum::Json;
use fyptrack_core::dates::parse_due_date;
use fyptrack_core::error::CoreError;
use fyptrack_core::section::{
    plan_due_date, resolve_single, validate_feedback, validate_score, DueDatePlan,
};
use fyptrack_core::types::DbId;
use fyptrack_db::models::section::ProjectSection;
use fyptrack_db::repositories::{ProjectRepo, SectionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::sections::{DueDateRequest, FeedbackRequest, ScoreRequest};
use crate::middleware::rbac::RequireGuide;
use crate::response::DataResponse;
use crate::state::AppState;

/// Every section row of the guide's projects.
async fn guide_sections(state: &AppState, guide_id: DbId) -> AppResult<Vec<ProjectSection>> {
    let project_ids: Vec<DbId> = ProjectRepo::list_for_guide(&state.pool, guide_id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    Ok(SectionRepo::list_by_projects(&state.pool, &project_ids).await?)
}

fn section_gone(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ProjectSection",
        id,
    })
}

/// PUT /api/v1/guide/sections/{identifier}/due-date
///
/// A resolved identifier spreads the due date to every section of the same
/// type. An unresolved section type creates pending sections in all active
/// projects. Returns the rows touched.
pub async fn set_due_date(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(identifier): Path<String>,
    Json(input): Json<DueDateRequest>,
) -> AppResult<Json<DataResponse<Vec<ProjectSection>>>> {
    let due_date = parse_due_date(&input.due_date)?;
    let sections = guide_sections(&state, guide.user_id).await?;
    let active = ProjectRepo::active_ids_for_guide(&state.pool, guide.user_id).await?;

    let rows = match plan_due_date(&sections, &identifier, &active)? {
        DueDatePlan::Update { section_ids } => {
            SectionRepo::set_due_date(&state.pool, &section_ids, due_date).await?
        }
        DueDatePlan::CreatePending {
            section_type,
            project_ids,
        } => {
            SectionRepo::upsert_due_date(&state.pool, &project_ids, section_type.as_str(), due_date)
                .await?
        }
    };

    tracing::info!(
        guide_id = guide.user_id,
        %identifier,
        sections = rows.len(),
        "Due date assigned",
    );
    Ok(Json(DataResponse { data: rows }))
}

/// PUT /api/v1/guide/sections/{identifier}/feedback
pub async fn set_feedback(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(identifier): Path<String>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<DataResponse<ProjectSection>>> {
    let feedback = validate_feedback(&input.feedback)?;
    let sections = guide_sections(&state, guide.user_id).await?;
    let id = resolve_single(&sections, &identifier)?;

    let row = SectionRepo::set_feedback(&state.pool, id, &feedback)
        .await?
        .ok_or_else(|| section_gone(id))?;
    Ok(Json(DataResponse { data: row }))
}

/// PUT /api/v1/guide/sections/{identifier}/score
pub async fn set_score(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(identifier): Path<String>,
    Json(input): Json<ScoreRequest>,
) -> AppResult<Json<DataResponse<ProjectSection>>> {
    validate_score(input.score)?;
    let sections = guide_sections(&state, guide.user_id).await?;
    let id = resolve_single(&sections, &identifier)?;

    let row = SectionRepo::set_score(&state.pool, id, input.score)
        .await?
        .ok_or_else(|| section_gone(id))?;
    Ok(Json(DataResponse { data: row }))
}
