//! Handlers for `/projects/{id}/sections/{type}`.
//!
//! Students submit content and files; the project's guide sets due dates,
//! feedback and scores and marks sections complete.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::Utc;
use fyptrack_core::dates::parse_due_date;
use fyptrack_core::error::CoreError;
use fyptrack_core::section::{
    self, section_content, submission_action, validate_feedback, validate_score,
    validate_submission, SectionType,
};
use fyptrack_core::storage::upload_batch;
use fyptrack_core::types::DbId;
use fyptrack_db::models::section::{ProjectSection, SubmitSection};
use fyptrack_db::models::submission_log::CreateSubmissionLog;
use fyptrack_db::repositories::{SectionRepo, SubmissionLogRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::read_form;
use crate::handlers::projects::{load_guided_project, load_student_project, SectionView};
use crate::middleware::rbac::{RequireGuide, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the section text.
const TEXT_FIELD: &str = "text";
/// Multipart field carrying attached files (repeatable).
const FILES_FIELD: &str = "files";

#[derive(Debug, Deserialize)]
pub struct DueDateRequest {
    /// ISO-8601 timestamp or a `YYYY-MM-DDTHH:MM` form value (UTC).
    pub due_date: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub score: i32,
}

fn section_not_found(project_id: DbId, section_type: SectionType) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "ProjectSection",
        key: format!("{project_id}/{}", section_type.as_str()),
    })
}

fn section_view(row: &ProjectSection) -> AppResult<SectionView> {
    let section_type = SectionType::from_name(&row.section_type)?;
    Ok(SectionView::build(section_type, Some(row), Utc::now()))
}

/// PUT /api/v1/projects/{id}/sections/{type}
///
/// Multipart body: `text` plus any number of `files`. Files are stored first,
/// then merged into the section's existing files.
pub async fn submit_section(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path((project_id, section_type)): Path<(DbId, String)>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<SectionView>>> {
    let section_type = SectionType::from_name(&section_type)?;
    load_student_project(&state, student.user_id, project_id).await?;

    let mut form = read_form(multipart).await?;
    let text = form.text(TEXT_FIELD).trim().to_string();
    let pending = form.take_files(FILES_FIELD);
    validate_submission(&text, pending.len())?;

    let existed =
        SectionRepo::find_by_project_and_type(&state.pool, project_id, section_type.as_str())
            .await?
            .is_some();

    let new_files = upload_batch(&*state.store, &pending, project_id, section_type).await?;
    let content = section_content(&text);

    let row = SectionRepo::submit(
        &state.pool,
        &SubmitSection {
            project_id,
            section_type: section_type.as_str().to_string(),
            content: content.clone(),
            new_files: new_files.clone(),
        },
    )
    .await?;

    let action = submission_action(existed);
    SubmissionLogRepo::create(
        &state.pool,
        &CreateSubmissionLog {
            project_id,
            student_id: student.user_id,
            section_type: section_type.as_str().to_string(),
            action: action.to_string(),
            content,
            files: new_files,
        },
    )
    .await?;

    tracing::info!(
        project_id,
        section = section_type.as_str(),
        student_id = student.user_id,
        action,
        files = pending.len(),
        "Section submitted",
    );

    Ok(Json(DataResponse {
        data: section_view(&row)?,
    }))
}

/// POST /api/v1/projects/{id}/sections/{type}/complete
pub async fn complete_section(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path((project_id, section_type)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<SectionView>>> {
    let section_type = SectionType::from_name(&section_type)?;
    load_guided_project(&state, guide.user_id, project_id).await?;

    let row = SectionRepo::mark_completed(&state.pool, project_id, section_type.as_str())
        .await?
        .ok_or_else(|| section_not_found(project_id, section_type))?;

    tracing::info!(project_id, section = section_type.as_str(), "Section marked completed");
    Ok(Json(DataResponse {
        data: section_view(&row)?,
    }))
}

/// PUT /api/v1/projects/{id}/sections/{type}/due-date
///
/// Creates the section as pending when it does not exist yet.
pub async fn set_section_due_date(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path((project_id, section_type)): Path<(DbId, String)>,
    Json(input): Json<DueDateRequest>,
) -> AppResult<Json<DataResponse<SectionView>>> {
    let section_type = SectionType::from_name(&section_type)?;
    let due_date = parse_due_date(&input.due_date)?;
    load_guided_project(&state, guide.user_id, project_id).await?;

    let rows =
        SectionRepo::upsert_due_date(&state.pool, &[project_id], section_type.as_str(), due_date)
            .await?;
    let row = rows
        .first()
        .ok_or_else(|| section_not_found(project_id, section_type))?;

    Ok(Json(DataResponse {
        data: section_view(row)?,
    }))
}

/// PUT /api/v1/projects/{id}/sections/{type}/feedback
pub async fn set_section_feedback(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path((project_id, section_type)): Path<(DbId, String)>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<DataResponse<SectionView>>> {
    let section_type = SectionType::from_name(&section_type)?;
    let feedback = validate_feedback(&input.feedback)?;
    load_guided_project(&state, guide.user_id, project_id).await?;

    let id = find_section_id(&state, project_id, section_type).await?;
    let row = SectionRepo::set_feedback(&state.pool, id, &feedback)
        .await?
        .ok_or_else(|| section_not_found(project_id, section_type))?;

    Ok(Json(DataResponse {
        data: section_view(&row)?,
    }))
}

/// PUT /api/v1/projects/{id}/sections/{type}/score
pub async fn set_section_score(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path((project_id, section_type)): Path<(DbId, String)>,
    Json(input): Json<ScoreRequest>,
) -> AppResult<Json<DataResponse<SectionView>>> {
    let section_type = SectionType::from_name(&section_type)?;
    validate_score(input.score)?;
    load_guided_project(&state, guide.user_id, project_id).await?;

    let id = find_section_id(&state, project_id, section_type).await?;
    let row = SectionRepo::set_score(&state.pool, id, input.score)
        .await?
        .ok_or_else(|| section_not_found(project_id, section_type))?;

    Ok(Json(DataResponse {
        data: section_view(&row)?,
    }))
}

async fn find_section_id(
    state: &AppState,
    project_id: DbId,
    section_type: SectionType,
) -> AppResult<DbId> {
    let sections = SectionRepo::list_by_projects(&state.pool, &[project_id]).await?;
    let selector = section::SectionSelector::Pair {
        project_id,
        section_type,
    };
    section::select_sections(&sections, &selector)
        .first()
        .map(|s| s.id)
        .ok_or_else(|| section_not_found(project_id, section_type))
}
