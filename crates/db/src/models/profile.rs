//! Profile (user account) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use fyptrack_core::types::{DbId, Timestamp};

/// Full row from the `profiles` table.
///
/// Carries the password hash, so it is never serialized. Use
/// [`ProfileResponse`] for anything leaving the service.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub roll_number: Option<String>,
    pub year: Option<i32>,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public view of a profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub roll_number: Option<String>,
    pub year: Option<i32>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&Profile> for ProfileResponse {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            email: p.email.clone(),
            role: p.role.clone(),
            department: p.department.clone(),
            designation: p.designation.clone(),
            roll_number: p.roll_number.clone(),
            year: p.year,
            is_active: p.is_active,
            last_login_at: p.last_login_at,
            created_at: p.created_at,
        }
    }
}

/// DTO for inserting a profile. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub roll_number: Option<String>,
    pub year: Option<i32>,
}
