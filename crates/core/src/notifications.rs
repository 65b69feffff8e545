//! Notification kinds and message builders.

/// Sent to a department's HOD when a project's final report arrives.
pub const KIND_FINAL_REPORT: &str = "final_report";

pub const FINAL_REPORT_TITLE: &str = "New Final Report Submitted";

/// Title and message for a final-report notification.
pub fn final_report_notice(project_title: &str) -> (&'static str, String) {
    (
        FINAL_REPORT_TITLE,
        format!("Final report for project \"{project_title}\" has been submitted."),
    )
}
