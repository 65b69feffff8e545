//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fyptrack_core::error::CoreError;
use fyptrack_core::roles::Role;
use fyptrack_db::models::profile::{CreateProfile, ProfileResponse};
use fyptrack_db::repositories::ProfileRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::{hash_new_password, validation_message};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`. Any role may be assigned.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    pub role: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub roll_number: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Year must be between 1 and 6"))]
    pub year: Option<i32>,
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProfileResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(validation_message(&e))))?;
    let role = Role::from_name(&input.role)?;
    let password_hash = hash_new_password(&input.password)?;

    let profile = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role: role.as_str().to_string(),
            department: input.department,
            designation: input.designation,
            roll_number: input.roll_number,
            year: input.year,
        },
    )
    .await?;

    tracing::info!(
        user_id = profile.id,
        role = %profile.role,
        admin_id = admin.user_id,
        "User created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProfileResponse::from(&profile),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<ProfileResponse>>>> {
    let users = ProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}
