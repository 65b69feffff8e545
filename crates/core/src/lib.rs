//! Domain logic for the FYP tracker.
//!
//! This crate has no database dependencies: repositories and handlers pass
//! rows in and persist whatever these functions decide.

pub mod dashboard;
pub mod dates;
pub mod error;
pub mod files;
pub mod notifications;
pub mod requests;
pub mod roles;
pub mod section;
pub mod status;
pub mod storage;
pub mod types;
