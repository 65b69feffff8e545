//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts

pub mod collaboration;
pub mod notification;
pub mod profile;
pub mod project;
pub mod project_request;
pub mod section;
pub mod session;
pub mod submission_log;
