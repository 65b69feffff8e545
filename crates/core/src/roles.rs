//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `profiles.role` in
//! `20250101000002_create_profiles.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_GUIDE: &str = "guide";
pub const ROLE_HOD: &str = "hod";
pub const ROLE_ADMIN: &str = "admin";

/// Roles a user may pick for themselves at sign-up. Admins are created by
/// other admins only.
pub const SELF_REGISTER_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_GUIDE, ROLE_HOD];

/// A user's role; selects which dashboard they see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Guide,
    Hod,
    Admin,
}

impl Role {
    /// Parse from the stored `profiles.role` value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            ROLE_STUDENT => Ok(Self::Student),
            ROLE_GUIDE => Ok(Self::Guide),
            ROLE_HOD => Ok(Self::Hod),
            ROLE_ADMIN => Ok(Self::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: student, guide, hod, admin"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => ROLE_STUDENT,
            Self::Guide => ROLE_GUIDE,
            Self::Hod => ROLE_HOD,
            Self::Admin => ROLE_ADMIN,
        }
    }
}

/// Validate a role requested through self sign-up.
pub fn validate_self_register_role(role: &str) -> Result<Role, CoreError> {
    if !SELF_REGISTER_ROLES.contains(&role) {
        return Err(CoreError::Validation(format!(
            "Role '{role}' cannot be chosen at sign-up"
        )));
    }
    Role::from_name(role)
}
