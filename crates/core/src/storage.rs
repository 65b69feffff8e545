//! Object storage abstraction and the local filesystem backend.
//!
//! Objects are addressed by `(bucket, path)`. The public bucket is served
//! directly; private buckets are only reachable through HMAC-signed URLs that
//! carry an expiry timestamp.

use std::path::PathBuf;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::files::{self, FileMetadata};
use crate::section::SectionType;
use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },

    #[error("Invalid object location: {0}")]
    InvalidLocation(String),

    #[error("Signed URL has expired")]
    Expired,

    #[error("Signed URL signature mismatch")]
    InvalidSignature,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A batch upload stopped part way through.
///
/// Objects stored before the failure are left in place and described by
/// `uploaded`.
#[derive(Debug, thiserror::Error)]
#[error("Upload of '{failed_file}' failed after {} file(s) were stored: {source}", uploaded.len())]
pub struct UploadBatchError {
    pub failed_file: String,
    pub uploaded: Vec<FileMetadata>,
    #[source]
    pub source: StorageError,
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Backend that persists and serves objects.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket/path`, replacing any existing object.
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Read an object back.
    fn download(
        &self,
        bucket: &str,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Unsigned URL for an object in a public bucket.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Time-limited URL for an object in any bucket.
    fn signed_url(&self, bucket: &str, path: &str, expires_in_secs: i64) -> String;
}

/// A file received from a client, waiting to be stored.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Store a batch of section files one after another.
///
/// Each file gets a fresh path under the section's folder in the public
/// bucket. The first failure aborts the batch.
pub async fn upload_batch<S: ObjectStore>(
    store: &S,
    uploads: &[PendingUpload],
    project_id: DbId,
    section_type: SectionType,
) -> Result<Vec<FileMetadata>, UploadBatchError> {
    let mut stored = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let path = files::section_upload_path(
            project_id,
            section_type,
            &upload.name,
            Utc::now().timestamp_millis(),
            &files::random_suffix(),
        );

        if let Err(source) = store
            .upload(
                files::PROJECT_FILES_BUCKET,
                &path,
                &upload.bytes,
                &upload.content_type,
            )
            .await
        {
            tracing::warn!(
                project_id,
                section = section_type.as_str(),
                file = %upload.name,
                stored = stored.len(),
                error = %source,
                "Section file upload failed",
            );
            return Err(UploadBatchError {
                failed_file: upload.name.clone(),
                uploaded: stored,
                source,
            });
        }

        stored.push(FileMetadata {
            name: upload.name.clone(),
            size: upload.bytes.len() as i64,
            content_type: upload.content_type.clone(),
            url: store.public_url(files::PROJECT_FILES_BUCKET, &path),
            path,
        });
    }

    Ok(stored)
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// HMAC-SHA256 over `bucket/path:expires`, hex encoded.
pub fn sign_object(secret: &str, bucket: &str, path: &str, expires: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{bucket}/{path}:{expires}").as_bytes());
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Check a signed URL's signature and expiry.
pub fn verify_signature(
    secret: &str,
    bucket: &str,
    path: &str,
    expires: i64,
    signature: &str,
    now: Timestamp,
) -> Result<(), StorageError> {
    let expected = sign_object(secret, bucket, path, expires);
    let matches = expected.len() == signature.len()
        && expected
            .bytes()
            .zip(signature.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0;
    if !matches {
        return Err(StorageError::InvalidSignature);
    }
    if now.timestamp() > expires {
        return Err(StorageError::Expired);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Local filesystem backend
// ---------------------------------------------------------------------------

/// Stores objects under `root/{bucket}/{path}` and serves them through the
/// API's `/files` routes.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
    signing_secret: String,
}

impl LocalObjectStore {
    pub fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        signing_secret: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            signing_secret: signing_secret.into(),
        }
    }

    pub fn signing_secret(&self) -> &str {
        &self.signing_secret
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        files::validate_bucket(bucket)
            .and_then(|_| files::validate_object_path(path))
            .map_err(|e| StorageError::InvalidLocation(e.to_string()))?;
        Ok(self.root.join(bucket).join(path))
    }
}

impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        tracing::debug!(bucket, path, size = bytes.len(), "Object stored");
        Ok(())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/api/v1/files/{bucket}/{}",
            self.public_base_url,
            files::encode_object_path(path)
        )
    }

    fn signed_url(&self, bucket: &str, path: &str, expires_in_secs: i64) -> String {
        let expires = Utc::now().timestamp() + expires_in_secs;
        let signature = sign_object(&self.signing_secret, bucket, path, expires);
        format!(
            "{}/api/v1/files/signed/{bucket}/{}?expires={expires}&signature={signature}",
            self.public_base_url,
            files::encode_object_path(path)
        )
    }
}
