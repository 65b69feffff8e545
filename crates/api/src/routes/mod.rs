pub mod admin;
pub mod auth;
pub mod collaboration;
pub mod dashboard;
pub mod files;
pub mod guide;
pub mod health;
pub mod notifications;
pub mod pages;
pub mod project_requests;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   self sign-up (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         caller profile
///
/// /dashboard                                       role-dispatched view
///
/// /guides                                          guide directory
/// /project-requests                                create (student)
/// /project-requests/{id}/approve                   approve (guide)
/// /project-requests/{id}/reject                    reject (guide)
///
/// /projects/{id}                                   detail + section tree
/// /projects/{id}/complete                          mark completed (guide)
/// /projects/{id}/final-report                      upload PDF (student)
/// /projects/{id}/sections/{type}                   submit (student, multipart)
/// /projects/{id}/sections/{type}/complete          mark completed (guide)
/// /projects/{id}/sections/{type}/due-date          set due date (guide)
/// /projects/{id}/sections/{type}/feedback          set feedback (guide)
/// /projects/{id}/sections/{type}/score             set score (guide)
///
/// /guide/sections/{identifier}/due-date            by id or type (guide)
/// /guide/sections/{identifier}/feedback            by id or type (guide)
/// /guide/sections/{identifier}/score               by id or type (guide)
///
/// /guide-requests                                  create (guide)
/// /hod/guide-requests/{id}                         decide (HOD)
/// /hod/guides                                      department guides (HOD)
/// /hod/invitations                                 invite a guide (HOD)
/// /invitations/{id}                                accept / decline (guide)
///
/// /notifications                                   list
/// /notifications/{id}/read                         mark read
///
/// /files/sign                                      signed URL
/// /files/preview                                   preview descriptor
/// /files/signed/{bucket}/{*path}                   signed download
/// /files/{bucket}/{*path}                          public download
///
/// /admin/users                                     list, create (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes.
        .nest("/auth", auth::router())
        // Role dashboards.
        .nest("/dashboard", dashboard::router())
        // Guide directory and project requests.
        .merge(project_requests::router())
        // Projects and their sections.
        .nest("/projects", projects::router())
        // Identifier-based section updates for guides.
        .nest("/guide", guide::router())
        // Guide requests, HOD views and invitations.
        .merge(collaboration::router())
        // Notifications.
        .nest("/notifications", notifications::router())
        // Object storage.
        .nest("/files", files::router())
        // Admin user management.
        .nest("/admin", admin::router())
}
