//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod collaboration_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod project_request_repo;
pub mod section_repo;
pub mod session_repo;
pub mod submission_log_repo;

pub use collaboration_repo::{GuideRequestRepo, InvitationRepo};
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use project_request_repo::ProjectRequestRepo;
pub use section_repo::SectionRepo;
pub use session_repo::SessionRepo;
pub use submission_log_repo::SubmissionLogRepo;
