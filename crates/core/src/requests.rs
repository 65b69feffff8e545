//! Validation for project requests, guide requests, and HOD invitations.

use crate::error::CoreError;

/// Longest accepted project title.
pub const MAX_TITLE_LEN: usize = 200;

/// Longest accepted free-text body (descriptions and messages).
pub const MAX_BODY_LEN: usize = 5000;

/// A project request ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProjectRequest {
    pub title: String,
    pub description: String,
}

/// Title and description are both required; surrounding whitespace is dropped.
pub fn validate_project_request(
    title: &str,
    description: &str,
) -> Result<ValidProjectRequest, CoreError> {
    let title = title.trim();
    let description = description.trim();

    if title.is_empty() || description.is_empty() {
        return Err(CoreError::Validation("Please fill in all fields".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Project title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if description.chars().count() > MAX_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Project description must be at most {MAX_BODY_LEN} characters"
        )));
    }

    Ok(ValidProjectRequest {
        title: title.to_string(),
        description: description.to_string(),
    })
}

/// Guide requests and HOD invitations need a non-blank message.
pub fn validate_message(message: &str) -> Result<String, CoreError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(CoreError::Validation(
            "Please select a guide and enter a message".into(),
        ));
    }
    if message.chars().count() > MAX_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Message must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(message.to_string())
}

/// Department of a project created from an approved request.
///
/// Uses the guide's department and falls back to the configured default.
pub fn project_department(guide_department: Option<&str>, default_department: &str) -> String {
    guide_department
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(default_department)
        .to_string()
}
