//! Handlers for `/files`: signed URLs, preview descriptors and downloads.

use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use fyptrack_core::error::CoreError;
use fyptrack_core::files::{
    self, FilePreview, DEFAULT_SIGNED_URL_EXPIRY_SECS, PUBLIC_BUCKETS,
};
use fyptrack_core::storage::{verify_signature, ObjectStore};
use fyptrack_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::{ensure_can_view, load_project};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest lifetime a caller may request for a signed URL (7 days).
const MAX_SIGNED_URL_EXPIRY_SECS: i64 = 7 * 24 * 3600;

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub bucket: String,
    pub path: String,
    pub expires_in: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SignedUrl {
    pub signed_url: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub preview: FilePreview,
    pub fallback: FilePreview,
}

#[derive(Debug, Deserialize)]
pub struct SignatureParams {
    pub expires: i64,
    pub signature: String,
}

fn validate_location(bucket: &str, path: &str) -> AppResult<()> {
    files::validate_bucket(bucket)?;
    files::validate_object_path(path)?;
    Ok(())
}

/// The project an object belongs to, or 404 for paths outside any project.
fn owning_project(bucket: &str, path: &str) -> AppResult<DbId> {
    files::project_id_from_object_path(bucket, path).ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "File",
            key: format!("{bucket}/{path}"),
        })
    })
}

fn object_response(path: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, files::content_type_for(path)),
            (CACHE_CONTROL, "private, max-age=300"),
        ],
        bytes,
    )
        .into_response()
}

/// POST /api/v1/files/sign
///
/// Signed URL for an object of a project the caller can see.
pub async fn sign(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SignRequest>,
) -> AppResult<Json<DataResponse<SignedUrl>>> {
    validate_location(&input.bucket, &input.path)?;
    let expires_in = input.expires_in.unwrap_or(DEFAULT_SIGNED_URL_EXPIRY_SECS);
    if !(1..=MAX_SIGNED_URL_EXPIRY_SECS).contains(&expires_in) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "expires_in must be between 1 and {MAX_SIGNED_URL_EXPIRY_SECS} seconds"
        ))));
    }

    let project_id = owning_project(&input.bucket, &input.path)?;
    let project = load_project(&state, project_id).await?;
    ensure_can_view(&state, &user, &project).await?;

    let signed_url = state.store.signed_url(&input.bucket, &input.path, expires_in);
    Ok(Json(DataResponse {
        data: SignedUrl {
            signed_url,
            expires_in,
        },
    }))
}

/// GET /api/v1/files/preview?name=&url=
pub async fn preview(
    _user: AuthUser,
    Query(params): Query<PreviewParams>,
) -> AppResult<Json<DataResponse<PreviewResponse>>> {
    let preview = files::preview_for(&params.name, &params.url);
    let fallback = preview.fallback();
    Ok(Json(DataResponse {
        data: PreviewResponse { preview, fallback },
    }))
}

/// GET /api/v1/files/{bucket}/{*path}
///
/// Objects in public buckets only; private buckets need a signed URL.
pub async fn download_public(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
) -> AppResult<Response> {
    validate_location(&bucket, &path)?;
    if !PUBLIC_BUCKETS.contains(&bucket.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "This file requires a signed URL".into(),
        )));
    }

    let bytes = state.store.download(&bucket, &path).await?;
    Ok(object_response(&path, bytes))
}

/// GET /api/v1/files/signed/{bucket}/{*path}?expires=&signature=
pub async fn download_signed(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
    Query(params): Query<SignatureParams>,
) -> AppResult<Response> {
    validate_location(&bucket, &path)?;
    verify_signature(
        state.store.signing_secret(),
        &bucket,
        &path,
        params.expires,
        &params.signature,
        Utc::now(),
    )?;

    let bytes = state.store.download(&bucket, &path).await?;
    Ok(object_response(&path, bytes))
}
