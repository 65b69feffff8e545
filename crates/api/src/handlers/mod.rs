//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers check the caller's role and ownership, delegate to the
//! repositories in `fyptrack_db` and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod admin;
pub mod auth;
pub mod collaboration;
pub mod dashboard;
pub mod files;
pub mod guide;
pub mod multipart;
pub mod notifications;
pub mod pages;
pub mod project_requests;
pub mod projects;
pub mod sections;
