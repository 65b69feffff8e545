//! Derived counts shown on the role dashboards.
//!
//! Every function here takes the rows a dashboard already loaded and counts
//! them; nothing re-queries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::roles::{ROLE_GUIDE, ROLE_HOD, ROLE_STUDENT};
use crate::section::{SECTION_COMPLETED, SECTION_SUBMITTED};
use crate::status::{PROJECT_ACTIVE, PROJECT_COMPLETED, REQUEST_PENDING};

/// Bucket for users or projects with no department set.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

fn count_status<'a>(statuses: impl IntoIterator<Item = &'a str>, wanted: &str) -> i64 {
    statuses.into_iter().filter(|s| *s == wanted).count() as i64
}

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentStats {
    pub total_projects: i64,
    pub pending_requests: i64,
    pub total_sections: i64,
    pub completed_sections: i64,
}

impl StudentStats {
    pub fn compute(project_count: usize, request_statuses: &[&str], section_statuses: &[&str]) -> Self {
        Self {
            total_projects: project_count as i64,
            pending_requests: count_status(request_statuses.iter().copied(), REQUEST_PENDING),
            total_sections: section_statuses.len() as i64,
            completed_sections: count_status(section_statuses.iter().copied(), SECTION_COMPLETED),
        }
    }
}

// ---------------------------------------------------------------------------
// Guide
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuideStats {
    pub active_projects: i64,
    pub pending_requests: i64,
    /// Sections waiting for the guide's review.
    pub submitted_sections: i64,
    pub completed_projects: i64,
}

impl GuideStats {
    pub fn compute(
        project_statuses: &[&str],
        request_statuses: &[&str],
        section_statuses: &[&str],
    ) -> Self {
        Self {
            active_projects: count_status(project_statuses.iter().copied(), PROJECT_ACTIVE),
            pending_requests: count_status(request_statuses.iter().copied(), REQUEST_PENDING),
            submitted_sections: count_status(section_statuses.iter().copied(), SECTION_SUBMITTED),
            completed_projects: count_status(project_statuses.iter().copied(), PROJECT_COMPLETED),
        }
    }
}

// ---------------------------------------------------------------------------
// HOD
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HodStats {
    pub total_projects: i64,
    pub active_projects: i64,
    pub students: i64,
    pub pending_guide_requests: i64,
}

impl HodStats {
    pub fn compute(
        project_statuses: &[&str],
        student_count: usize,
        guide_request_statuses: &[&str],
    ) -> Self {
        Self {
            total_projects: project_statuses.len() as i64,
            active_projects: count_status(project_statuses.iter().copied(), PROJECT_ACTIVE),
            students: student_count as i64,
            pending_guide_requests: count_status(
                guide_request_statuses.iter().copied(),
                REQUEST_PENDING,
            ),
        }
    }
}

/// Case-insensitive substring match on a guide's name or email.
///
/// A blank query matches everyone.
pub fn matches_guide_search(name: &str, email: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || name.to_lowercase().contains(&query)
        || email.to_lowercase().contains(&query)
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    pub students: i64,
    pub guides: i64,
    pub hods: i64,
    pub projects: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_projects: i64,
    pub active_projects: i64,
    pub total_departments: i64,
    pub departments: BTreeMap<String, DepartmentStats>,
}

/// The fields of a profile the admin view counts.
#[derive(Debug, Clone, Copy)]
pub struct UserFacts<'a> {
    pub role: &'a str,
    pub department: Option<&'a str>,
}

/// The fields of a project the admin view counts.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFacts<'a> {
    pub status: &'a str,
    pub department: Option<&'a str>,
}

impl AdminStats {
    /// Departments are discovered from users. Projects only count towards a
    /// department that has at least one user.
    pub fn compute(users: &[UserFacts<'_>], projects: &[ProjectFacts<'_>]) -> Self {
        let mut departments: BTreeMap<String, DepartmentStats> = BTreeMap::new();

        for user in users {
            let dept = departments
                .entry(user.department.unwrap_or(UNASSIGNED_DEPARTMENT).to_string())
                .or_default();
            match user.role {
                ROLE_STUDENT => dept.students += 1,
                ROLE_GUIDE => dept.guides += 1,
                ROLE_HOD => dept.hods += 1,
                _ => {}
            }
        }

        for project in projects {
            let key = project.department.unwrap_or(UNASSIGNED_DEPARTMENT);
            if let Some(dept) = departments.get_mut(key) {
                dept.projects += 1;
            }
        }

        Self {
            total_users: users.len() as i64,
            total_projects: projects.len() as i64,
            active_projects: count_status(projects.iter().map(|p| p.status), PROJECT_ACTIVE),
            total_departments: departments.len() as i64,
            departments,
        }
    }
}
