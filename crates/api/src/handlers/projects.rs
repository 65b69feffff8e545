//! Handlers for the `/projects` resource, plus the project view shared with
//! the dashboards.
//!
//! A project view is the project row, the fixed seven-section tree with
//! effective statuses and file previews, and a signed link to the final
//! report when one exists.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::Utc;
use fyptrack_core::dates::format_date_for_display;
use fyptrack_core::error::CoreError;
use fyptrack_core::files::{
    self, FileMetadata, FilePreview, DEFAULT_SIGNED_URL_EXPIRY_SECS, FINAL_REPORTS_BUCKET,
};
use fyptrack_core::notifications::{final_report_notice, KIND_FINAL_REPORT};
use fyptrack_core::requests::project_department;
use fyptrack_core::roles::Role;
use fyptrack_core::section::{effective_status, SectionType, SECTION_PENDING};
use fyptrack_core::storage::ObjectStore;
use fyptrack_core::types::{DbId, Timestamp};
use fyptrack_db::models::notification::CreateNotification;
use fyptrack_db::models::project::Project;
use fyptrack_db::models::section::ProjectSection;
use fyptrack_db::models::submission_log::SubmissionLog;
use fyptrack_db::repositories::{
    NotificationRepo, ProfileRepo, ProjectRepo, SectionRepo, SubmissionLogRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::read_form;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireGuide, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A stored file with its preview descriptor.
#[derive(Debug, Serialize)]
pub struct FileView {
    #[serde(flatten)]
    pub file: FileMetadata,
    pub preview: FilePreview,
    /// What to show if `preview` fails to load.
    pub fallback: FilePreview,
}

impl From<&FileMetadata> for FileView {
    fn from(file: &FileMetadata) -> Self {
        let preview = files::preview_for(&file.name, &file.url);
        let fallback = preview.fallback();
        Self {
            file: file.clone(),
            preview,
            fallback,
        }
    }
}

/// One card of the section tree. Sections without a row read as pending.
#[derive(Debug, Serialize)]
pub struct SectionView {
    pub section_type: SectionType,
    pub title: &'static str,
    pub description: &'static str,
    pub scorable: bool,
    pub id: Option<DbId>,
    /// Effective status: pending sections past their due date are `overdue`.
    pub status: String,
    pub content: serde_json::Value,
    pub files: Vec<FileView>,
    pub due_date: Option<Timestamp>,
    /// `dd/mm/yyyy`, empty without a due date.
    pub due_date_display: String,
    pub feedback: Option<String>,
    pub score: Option<i32>,
    pub submitted_at: Option<Timestamp>,
}

impl SectionView {
    pub fn build(section_type: SectionType, row: Option<&ProjectSection>, now: Timestamp) -> Self {
        let due_date = row.and_then(|r| r.due_date);
        Self {
            section_type,
            title: section_type.title(),
            description: section_type.description(),
            scorable: section_type.scorable(),
            id: row.map(|r| r.id),
            status: effective_status(
                row.map_or(SECTION_PENDING, |r| r.status.as_str()),
                due_date,
                now,
            )
            .to_string(),
            content: row
                .map(|r| r.content.clone())
                .unwrap_or_else(|| serde_json::json!({})),
            files: row
                .map(|r| r.files.0.iter().map(FileView::from).collect())
                .unwrap_or_default(),
            due_date,
            due_date_display: format_date_for_display(due_date),
            feedback: row.and_then(|r| r.feedback.clone()),
            score: row.and_then(|r| r.score),
            submitted_at: row.and_then(|r| r.submitted_at),
        }
    }
}

/// The seven-section tree of one project, in display order.
pub fn section_tree(
    project_id: DbId,
    sections: &[ProjectSection],
    now: Timestamp,
) -> Vec<SectionView> {
    SectionType::ALL
        .into_iter()
        .map(|t| {
            let row = sections
                .iter()
                .find(|s| s.project_id == project_id && s.section_type == t.as_str());
            SectionView::build(t, row, now)
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub sections: Vec<SectionView>,
    /// Time-limited download link for the final report.
    pub final_report_signed_url: Option<String>,
}

impl ProjectView {
    pub fn build(
        project: Project,
        sections: &[ProjectSection],
        store: &impl ObjectStore,
        now: Timestamp,
    ) -> Self {
        let final_report_signed_url = project.final_report_url.as_deref().map(|path| {
            store.signed_url(FINAL_REPORTS_BUCKET, path, DEFAULT_SIGNED_URL_EXPIRY_SECS)
        });
        Self {
            sections: section_tree(project.id, sections, now),
            project,
            final_report_signed_url,
        }
    }
}

/// Project views for a list of projects, loading their sections in one query.
pub async fn project_views(
    state: &AppState,
    projects: Vec<Project>,
) -> AppResult<Vec<ProjectView>> {
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let sections = SectionRepo::list_by_projects(&state.pool, &ids).await?;
    let now = Utc::now();
    Ok(projects
        .into_iter()
        .map(|p| ProjectView::build(p, &sections, &*state.store, now))
        .collect())
}

/// Response for `GET /projects/{id}`.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub view: ProjectView,
    /// Submission audit trail, oldest first.
    pub history: Vec<SubmissionLog>,
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

pub async fn load_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Students see their own projects, guides the ones they supervise, HODs
/// those of their department and admins everything.
pub async fn ensure_can_view(
    state: &AppState,
    user: &AuthUser,
    project: &Project,
) -> AppResult<()> {
    let allowed = match Role::from_name(&user.role)? {
        Role::Student => project.has_student(user.user_id),
        Role::Guide => project.guide_id == user.user_id,
        Role::Admin => true,
        Role::Hod => {
            let department = hod_department(state, user.user_id).await?;
            project.department.as_deref() == Some(department.as_str())
        }
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this project".into(),
        )))
    }
}

/// The department a HOD oversees.
pub async fn hod_department(state: &AppState, hod_id: DbId) -> AppResult<String> {
    let hod = ProfileRepo::find_by_id(&state.pool, hod_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(project_department(
        hod.department.as_deref(),
        &state.config.default_department,
    ))
}

/// Load a project the calling student belongs to.
pub async fn load_student_project(
    state: &AppState,
    student_id: DbId,
    id: DbId,
) -> AppResult<Project> {
    let project = load_project(state, id).await?;
    if !project.has_student(student_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a member of this project".into(),
        )));
    }
    Ok(project)
}

/// Load a project the calling guide supervises.
pub async fn load_guided_project(state: &AppState, guide_id: DbId, id: DbId) -> AppResult<Project> {
    let project = load_project(state, id).await?;
    if project.guide_id != guide_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not the guide of this project".into(),
        )));
    }
    Ok(project)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = load_project(&state, id).await?;
    ensure_can_view(&state, &user, &project).await?;

    let sections = SectionRepo::list_by_projects(&state.pool, &[id]).await?;
    let history = SubmissionLogRepo::list_for_project(&state.pool, id).await?;
    let view = ProjectView::build(project, &sections, &*state.store, Utc::now());

    Ok(Json(DataResponse {
        data: ProjectDetail { view, history },
    }))
}

/// POST /api/v1/projects/{id}/complete
pub async fn complete_project(
    State(state): State<AppState>,
    RequireGuide(guide): RequireGuide,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    load_guided_project(&state, guide.user_id, id).await?;

    let project = ProjectRepo::mark_completed(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(project_id = id, guide_id = guide.user_id, "Project marked completed");
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/final-report
///
/// Multipart body with a single PDF in the `file` field. Notifies the first
/// HOD of the guide's department.
pub async fn upload_final_report(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ProjectView>>> {
    let project = load_student_project(&state, student.user_id, id).await?;

    let mut form = read_form(multipart).await?;
    let report = form.take_files("file").into_iter().next().ok_or_else(|| {
        AppError::Core(CoreError::Validation("Please select a PDF file only.".into()))
    })?;
    files::validate_final_report(&report.name, &report.content_type)?;

    let path = files::final_report_path(id, Utc::now().timestamp_millis());
    state
        .store
        .upload(
            FINAL_REPORTS_BUCKET,
            &path,
            &report.bytes,
            files::CONTENT_TYPE_PDF,
        )
        .await?;

    let project = ProjectRepo::set_final_report(&state.pool, id, &path)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    tracing::info!(project_id = id, student_id = student.user_id, %path, "Final report stored");

    notify_final_report(&state, &project).await?;

    let sections = SectionRepo::list_by_projects(&state.pool, &[id]).await?;
    Ok(Json(DataResponse {
        data: ProjectView::build(project, &sections, &*state.store, Utc::now()),
    }))
}

async fn notify_final_report(state: &AppState, project: &Project) -> AppResult<()> {
    let guide_department = ProfileRepo::find_guide(&state.pool, project.guide_id)
        .await?
        .and_then(|g| g.department);
    let department = project_department(
        guide_department.as_deref().or(project.department.as_deref()),
        &state.config.default_department,
    );

    let Some(hod) = ProfileRepo::find_first_hod(&state.pool, &department).await? else {
        tracing::warn!(project_id = project.id, %department, "No HOD to notify of final report");
        return Ok(());
    };

    let (title, message) = final_report_notice(&project.title);
    NotificationRepo::create(
        &state.pool,
        &CreateNotification {
            user_id: hod.id,
            project_id: Some(project.id),
            kind: KIND_FINAL_REPORT.to_string(),
            title: title.to_string(),
            message,
        },
    )
    .await?;
    Ok(())
}

