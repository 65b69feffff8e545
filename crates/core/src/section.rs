//! Project section catalogue and section resolution.
//!
//! Every project tracks the same seven deliverable sections. Rows in
//! `project_sections` are created lazily, so callers work with whatever
//! subset exists and use the helpers here to decide which rows an action
//! touches and which rows must be created.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SECTION_PENDING: &str = "pending";
pub const SECTION_SUBMITTED: &str = "submitted";
pub const SECTION_COMPLETED: &str = "completed";
pub const SECTION_OVERDUE: &str = "overdue";

/// Submission log action for a section that did not exist yet.
pub const ACTION_SUBMIT: &str = "submit";
/// Submission log action for a re-submission.
pub const ACTION_UPDATE: &str = "update";

/// Lowest score a guide can award.
pub const MIN_SCORE: i32 = 0;
/// Highest score a guide can award.
pub const MAX_SCORE: i32 = 10;

// ---------------------------------------------------------------------------
// Section types
// ---------------------------------------------------------------------------

/// One of the seven fixed deliverable categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    TeamInformation,
    ProjectObjectives,
    TechnologiesUsed,
    LiteratureReview,
    SystemDesign,
    Implementation,
    FinalPresentation,
}

impl SectionType {
    /// All section types in display order.
    pub const ALL: [SectionType; 7] = [
        SectionType::TeamInformation,
        SectionType::ProjectObjectives,
        SectionType::TechnologiesUsed,
        SectionType::LiteratureReview,
        SectionType::SystemDesign,
        SectionType::Implementation,
        SectionType::FinalPresentation,
    ];

    /// Parse from the stored `section_type` value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown section type '{name}'. Must be one of: {}",
                    Self::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TeamInformation => "team_information",
            Self::ProjectObjectives => "project_objectives",
            Self::TechnologiesUsed => "technologies_used",
            Self::LiteratureReview => "literature_review",
            Self::SystemDesign => "system_design",
            Self::Implementation => "implementation",
            Self::FinalPresentation => "final_presentation",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::TeamInformation => "Team Information",
            Self::ProjectObjectives => "Project Objectives",
            Self::TechnologiesUsed => "Technologies and Tools Used",
            Self::LiteratureReview => "Literature Review",
            Self::SystemDesign => "System Design",
            Self::Implementation => "Implementation",
            Self::FinalPresentation => "Final Presentation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::TeamInformation => "Details about your team members and roles",
            Self::ProjectObjectives => "Define your project goals and objectives",
            Self::TechnologiesUsed => "List of technologies and tools for your project",
            Self::LiteratureReview => "Research and references related to your project",
            Self::SystemDesign => "System architecture and design documentation",
            Self::Implementation => "Implementation details and code documentation",
            Self::FinalPresentation => "Your final project presentation",
        }
    }

    /// Every section currently accepts a guide score.
    pub fn scorable(self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The fields of a section row that resolution looks at.
pub trait SectionRow {
    fn id(&self) -> DbId;
    fn project_id(&self) -> DbId;
    fn section_type(&self) -> &str;
}

/// Structured way of naming sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionSelector {
    /// A single row by primary key.
    Id(DbId),
    /// Every row of one type across the caller's projects.
    Type(SectionType),
    /// The row of one type in one project.
    Pair {
        project_id: DbId,
        section_type: SectionType,
    },
}

/// Rows matching a structured selector.
pub fn select_sections<'a, S: SectionRow>(
    sections: &'a [S],
    selector: &SectionSelector,
) -> Vec<&'a S> {
    sections
        .iter()
        .filter(|s| match selector {
            SectionSelector::Id(id) => s.id() == *id,
            SectionSelector::Type(t) => s.section_type() == t.as_str(),
            SectionSelector::Pair {
                project_id,
                section_type,
            } => s.project_id() == *project_id && s.section_type() == section_type.as_str(),
        })
        .collect()
}

/// Resolve an overloaded identifier that is either a row id or a section type.
///
/// An exact id match wins and yields exactly that row. Otherwise every row
/// whose `section_type` equals the identifier is returned (possibly none).
pub fn resolve_sections<'a, S: SectionRow>(sections: &'a [S], identifier: &str) -> Vec<&'a S> {
    if let Ok(id) = identifier.trim().parse::<DbId>() {
        if let Some(row) = sections.iter().find(|s| s.id() == id) {
            return vec![row];
        }
    }
    sections
        .iter()
        .filter(|s| s.section_type() == identifier)
        .collect()
}

/// What a due-date assignment must do to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDatePlan {
    /// Set the due date on these existing rows.
    Update { section_ids: Vec<DbId> },
    /// Create a pending row of this type in each listed project.
    CreatePending {
        section_type: SectionType,
        project_ids: Vec<DbId>,
    },
}

/// Decide how a due date given for `identifier` is applied.
///
/// Due dates are per section type: once any row resolves, all rows sharing
/// its type get the date. When nothing resolves the identifier must name a
/// section type, and a pending row is planned for every active project.
pub fn plan_due_date<S: SectionRow>(
    sections: &[S],
    identifier: &str,
    active_project_ids: &[DbId],
) -> Result<DueDatePlan, CoreError> {
    if let Some(first) = resolve_sections(sections, identifier).first() {
        let matched_type = first.section_type();
        let section_ids = sections
            .iter()
            .filter(|s| s.section_type() == matched_type)
            .map(|s| s.id())
            .collect();
        return Ok(DueDatePlan::Update { section_ids });
    }

    let section_type = SectionType::from_name(identifier)?;
    Ok(DueDatePlan::CreatePending {
        section_type,
        project_ids: active_project_ids.to_vec(),
    })
}

/// Pick the single row a feedback or score update applies to.
pub fn resolve_single<S: SectionRow>(sections: &[S], identifier: &str) -> Result<DbId, CoreError> {
    resolve_sections(sections, identifier)
        .first()
        .map(|s| s.id())
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "ProjectSection",
            key: identifier.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a guide score.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate guide feedback and return it trimmed.
pub fn validate_feedback(feedback: &str) -> Result<String, CoreError> {
    let trimmed = feedback.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Feedback must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// A student submission needs some text or at least one file.
pub fn validate_submission(text: &str, file_count: usize) -> Result<(), CoreError> {
    if text.trim().is_empty() && file_count == 0 {
        return Err(CoreError::Validation(
            "Please add some content or files before updating".into(),
        ));
    }
    Ok(())
}

/// Content payload stored for a section submission.
pub fn section_content(text: &str) -> serde_json::Value {
    serde_json::json!({ "text": text })
}

/// Submission log action for a section that did or did not exist before.
pub fn submission_action(section_existed: bool) -> &'static str {
    if section_existed {
        ACTION_UPDATE
    } else {
        ACTION_SUBMIT
    }
}

/// Status shown to users: open sections past their due date read as overdue.
pub fn effective_status<'a>(
    stored: &'a str,
    due_date: Option<Timestamp>,
    now: Timestamp,
) -> &'a str {
    match due_date {
        Some(due) if stored == SECTION_PENDING && due < now => SECTION_OVERDUE,
        _ => stored,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    #[derive(Debug)]
    struct Row {
        id: DbId,
        project_id: DbId,
        section_type: &'static str,
    }

    impl SectionRow for Row {
        fn id(&self) -> DbId {
            self.id
        }
        fn project_id(&self) -> DbId {
            self.project_id
        }
        fn section_type(&self) -> &str {
            self.section_type
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, project_id: 10, section_type: "team_information" },
            Row { id: 2, project_id: 10, section_type: "system_design" },
            Row { id: 3, project_id: 11, section_type: "team_information" },
            Row { id: 4, project_id: 11, section_type: "implementation" },
        ]
    }

    #[test]
    fn catalogue_has_seven_unique_types() {
        let names: std::collections::HashSet<_> =
            SectionType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names.len(), 7);
        for t in SectionType::ALL {
            assert_eq!(SectionType::from_name(t.as_str()).unwrap(), t);
        }
        assert!(SectionType::from_name("appendix").is_err());
    }

    #[test]
    fn resolve_by_existing_id_returns_exactly_that_row() {
        let rows = rows();
        let found = resolve_sections(&rows, "3");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);
    }

    #[test]
    fn resolve_by_type_returns_all_rows_of_that_type() {
        let rows = rows();
        let found: Vec<DbId> = resolve_sections(&rows, "team_information")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn resolve_unknown_numeric_id_falls_through_to_type() {
        let rows = rows();
        assert!(resolve_sections(&rows, "99").is_empty());
    }

    #[test]
    fn select_by_pair() {
        let rows = rows();
        let found = select_sections(
            &rows,
            &SectionSelector::Pair {
                project_id: 11,
                section_type: SectionType::TeamInformation,
            },
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);
    }

    #[test]
    fn due_date_by_id_spreads_to_same_type() {
        let rows = rows();
        let plan = plan_due_date(&rows, "1", &[10, 11]).unwrap();
        assert_eq!(plan, DueDatePlan::Update { section_ids: vec![1, 3] });
    }

    #[test]
    fn due_date_for_missing_type_creates_for_active_projects() {
        let rows = rows();
        let plan = plan_due_date(&rows, "literature_review", &[10, 12]).unwrap();
        assert_eq!(
            plan,
            DueDatePlan::CreatePending {
                section_type: SectionType::LiteratureReview,
                project_ids: vec![10, 12],
            }
        );
    }

    #[test]
    fn due_date_for_unknown_identifier_is_rejected() {
        let rows = rows();
        assert_matches!(
            plan_due_date(&rows, "999", &[10]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn single_resolution_takes_first_match() {
        let rows = rows();
        assert_eq!(resolve_single(&rows, "team_information").unwrap(), 1);
        assert_matches!(
            resolve_single(&rows, "final_presentation"),
            Err(CoreError::NotFoundByKey { .. })
        );
    }

    #[test]
    fn score_bounds() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(10).is_ok());
        assert!(validate_score(-1).is_err());
        assert!(validate_score(11).is_err());
    }

    #[test]
    fn feedback_is_trimmed_and_required() {
        assert_eq!(validate_feedback("  good work ").unwrap(), "good work");
        assert!(validate_feedback("   ").is_err());
    }

    #[test]
    fn submission_requires_text_or_files() {
        assert!(validate_submission("", 0).is_err());
        assert!(validate_submission("  ", 0).is_err());
        assert!(validate_submission("", 1).is_ok());
        assert!(validate_submission("draft", 0).is_ok());
    }

    #[test]
    fn overdue_only_applies_to_pending_sections() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));
        let future = Some(now + Duration::hours(1));
        assert_eq!(effective_status("pending", past, now), "overdue");
        assert_eq!(effective_status("pending", future, now), "pending");
        assert_eq!(effective_status("submitted", past, now), "submitted");
        assert_eq!(effective_status("pending", None, now), "pending");
    }

    #[test]
    fn submission_action_reflects_existence() {
        assert_eq!(submission_action(true), "update");
        assert_eq!(submission_action(false), "submit");
    }
}
