//! Handler for the role-dispatched `/dashboard`.
//!
//! Each role gets its own view: the rows that role works with plus a few
//! derived counts. Clients re-fetch the dashboard after every mutation.

use axum::extract::State;
use axum::Json;
use fyptrack_core::dashboard::{
    AdminStats, GuideStats, HodStats, ProjectFacts, StudentStats, UserFacts,
};
use fyptrack_core::error::CoreError;
use fyptrack_core::requests::project_department;
use fyptrack_core::roles::{Role, ROLE_GUIDE, ROLE_STUDENT};
use fyptrack_db::models::collaboration::{
    GuideRequest, GuideRequestWithGuide, HodInvitation, InvitationWithGuide,
};
use fyptrack_db::models::notification::Notification;
use fyptrack_db::models::profile::ProfileResponse;
use fyptrack_db::models::project::Project;
use fyptrack_db::models::project_request::ProjectRequest;
use fyptrack_db::repositories::{
    GuideRequestRepo, InvitationRepo, NotificationRepo, ProfileRepo, ProjectRepo,
    ProjectRequestRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::{project_views, ProjectView};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub profile: ProfileResponse,
    pub stats: StudentStats,
    pub projects: Vec<ProjectView>,
    pub requests: Vec<ProjectRequest>,
    /// Guides the student can send a project request to.
    pub guides: Vec<ProfileResponse>,
}

#[derive(Debug, Serialize)]
pub struct GuideDashboard {
    pub profile: ProfileResponse,
    pub stats: GuideStats,
    pub projects: Vec<ProjectView>,
    pub requests: Vec<ProjectRequest>,
    pub invitations: Vec<HodInvitation>,
    pub guide_requests: Vec<GuideRequest>,
}

#[derive(Debug, Serialize)]
pub struct HodDashboard {
    pub profile: ProfileResponse,
    pub department: String,
    pub stats: HodStats,
    pub projects: Vec<ProjectView>,
    pub students: Vec<ProfileResponse>,
    pub guides: Vec<ProfileResponse>,
    pub guide_requests: Vec<GuideRequestWithGuide>,
    pub invitations: Vec<InvitationWithGuide>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub profile: ProfileResponse,
    pub stats: AdminStats,
    pub users: Vec<ProfileResponse>,
    pub projects: Vec<Project>,
}

/// One dashboard per role, tagged with `"role"`.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardView {
    Student(StudentDashboard),
    Guide(GuideDashboard),
    Hod(HodDashboard),
    Admin(AdminDashboard),
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardView>>> {
    let view = build_dashboard(&state, &user).await?;
    Ok(Json(DataResponse { data: view }))
}

/// Assemble the caller's dashboard. Shared with the `/` page route.
pub async fn build_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardView> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    let profile = ProfileResponse::from(&profile);

    let view = match Role::from_name(&profile.role)? {
        Role::Student => DashboardView::Student(student_dashboard(state, profile).await?),
        Role::Guide => DashboardView::Guide(guide_dashboard(state, profile).await?),
        Role::Hod => DashboardView::Hod(hod_dashboard(state, profile).await?),
        Role::Admin => DashboardView::Admin(admin_dashboard(state, profile).await?),
    };
    Ok(view)
}

/// Statuses of the sections that have a row. Untouched sections are not counted.
fn section_statuses(projects: &[ProjectView]) -> Vec<&str> {
    projects
        .iter()
        .flat_map(|p| p.sections.iter())
        .filter(|s| s.id.is_some())
        .map(|s| s.status.as_str())
        .collect()
}

async fn student_dashboard(
    state: &AppState,
    profile: ProfileResponse,
) -> AppResult<StudentDashboard> {
    let projects = ProjectRepo::list_for_student(&state.pool, profile.id).await?;
    let projects = project_views(state, projects).await?;
    let requests = ProjectRequestRepo::list_for_student(&state.pool, profile.id).await?;
    let guides = ProfileRepo::list_by_role(&state.pool, ROLE_GUIDE, None).await?;

    let request_statuses: Vec<&str> = requests.iter().map(|r| r.status.as_str()).collect();
    let stats = StudentStats::compute(
        projects.len(),
        &request_statuses,
        &section_statuses(&projects),
    );

    Ok(StudentDashboard {
        profile,
        stats,
        projects,
        requests,
        guides,
    })
}

async fn guide_dashboard(state: &AppState, profile: ProfileResponse) -> AppResult<GuideDashboard> {
    let projects = ProjectRepo::list_for_guide(&state.pool, profile.id).await?;
    let projects = project_views(state, projects).await?;
    let requests = ProjectRequestRepo::list_for_guide(&state.pool, profile.id).await?;
    let invitations = InvitationRepo::list_for_guide(&state.pool, profile.id).await?;
    let guide_requests = GuideRequestRepo::list_for_guide(&state.pool, profile.id).await?;

    let project_statuses: Vec<&str> = projects.iter().map(|p| p.project.status.as_str()).collect();
    let request_statuses: Vec<&str> = requests.iter().map(|r| r.status.as_str()).collect();
    let stats = GuideStats::compute(
        &project_statuses,
        &request_statuses,
        &section_statuses(&projects),
    );

    Ok(GuideDashboard {
        profile,
        stats,
        projects,
        requests,
        invitations,
        guide_requests,
    })
}

async fn hod_dashboard(state: &AppState, profile: ProfileResponse) -> AppResult<HodDashboard> {
    let department = project_department(
        profile.department.as_deref(),
        &state.config.default_department,
    );

    let projects = ProjectRepo::list_by_department(&state.pool, &department).await?;
    let projects = project_views(state, projects).await?;
    let students = ProfileRepo::list_by_role(&state.pool, ROLE_STUDENT, Some(&department)).await?;
    let guides = ProfileRepo::list_by_role(&state.pool, ROLE_GUIDE, Some(&department)).await?;
    let guide_requests = GuideRequestRepo::list_for_hod(&state.pool, profile.id).await?;
    let invitations = InvitationRepo::list_for_hod(&state.pool, profile.id).await?;
    let notifications = NotificationRepo::list_for_user(&state.pool, profile.id).await?;

    let project_statuses: Vec<&str> = projects.iter().map(|p| p.project.status.as_str()).collect();
    let request_statuses: Vec<&str> = guide_requests
        .iter()
        .map(|r| r.request.status.as_str())
        .collect();
    let stats = HodStats::compute(&project_statuses, students.len(), &request_statuses);

    Ok(HodDashboard {
        profile,
        department,
        stats,
        projects,
        students,
        guides,
        guide_requests,
        invitations,
        notifications,
    })
}

async fn admin_dashboard(state: &AppState, profile: ProfileResponse) -> AppResult<AdminDashboard> {
    let users = ProfileRepo::list(&state.pool).await?;
    let projects = ProjectRepo::list(&state.pool).await?;

    let user_facts: Vec<UserFacts<'_>> = users
        .iter()
        .map(|u| UserFacts {
            role: &u.role,
            department: u.department.as_deref(),
        })
        .collect();
    let project_facts: Vec<ProjectFacts<'_>> = projects
        .iter()
        .map(|p| ProjectFacts {
            status: &p.status,
            department: p.department.as_deref(),
        })
        .collect();
    let stats = AdminStats::compute(&user_facts, &project_facts);

    Ok(AdminDashboard {
        profile,
        stats,
        users,
        projects,
    })
}
