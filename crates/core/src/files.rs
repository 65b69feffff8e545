//! File metadata, storage path conventions, and preview dispatch.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::section::SectionType;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Public bucket holding section attachments.
pub const PROJECT_FILES_BUCKET: &str = "project_files";

/// Private bucket holding final reports; reachable through signed URLs only.
pub const FINAL_REPORTS_BUCKET: &str = "final-reports";

/// Buckets whose objects may be fetched without a signature.
pub const PUBLIC_BUCKETS: &[&str] = &[PROJECT_FILES_BUCKET];

/// All buckets the service writes to.
pub const KNOWN_BUCKETS: &[&str] = &[PROJECT_FILES_BUCKET, FINAL_REPORTS_BUCKET];

/// Default lifetime of a signed URL in seconds.
pub const DEFAULT_SIGNED_URL_EXPIRY_SECS: i64 = 3600;

pub const CONTENT_TYPE_PDF: &str = "application/pdf";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Length of the random component in generated object names.
const RANDOM_SUFFIX_LEN: usize = 6;

/// Longest extension carried over from an uploaded file name.
const MAX_STORED_EXTENSION_LEN: usize = 10;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "ppt", "pptx", "xls", "xlsx"];

/// Online viewer used to embed office documents.
const OFFICE_VIEWER_BASE: &str = "https://docs.google.com/gview";

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Metadata recorded for every stored file, kept in a section's `files` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Original file name as uploaded.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type reported by the client.
    #[serde(rename = "type")]
    pub content_type: String,
    /// URL the file can be fetched from.
    pub url: String,
    /// Object path inside the bucket.
    pub path: String,
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Lower-cased extension of a file name, or an empty string when there is none.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() || !ext.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Extension of an uploaded file name that is safe to reuse in an object path.
///
/// Only short ASCII alphanumeric extensions qualify; anything else yields
/// `None` and the object is stored without one. Case is preserved.
pub fn stored_extension(file_name: &str) -> Option<&str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let safe = !ext.is_empty()
        && ext.len() <= MAX_STORED_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    safe.then_some(ext)
}

/// Percent-encode every segment of an object path for use in a URL.
pub fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Random lowercase alphanumeric suffix for object names.
pub fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

/// Object path for a section attachment.
///
/// Convention: `uploads/{project_id}/{section}/{section}_{millis}_{suffix}.{ext}`.
/// The extension keeps the case of the original name and is omitted when the
/// original has none or it is not plain alphanumeric (see [`stored_extension`]).
pub fn section_upload_path(
    project_id: DbId,
    section_type: SectionType,
    original_name: &str,
    millis: i64,
    suffix: &str,
) -> String {
    let section = section_type.as_str();
    let mut path = format!("uploads/{project_id}/{section}/{section}_{millis}_{suffix}");
    if let Some(ext) = stored_extension(original_name) {
        path.push('.');
        path.push_str(ext);
    }
    path
}

/// Object path for a project's final report.
pub fn final_report_path(project_id: DbId, millis: i64) -> String {
    format!("{project_id}/final_report_{millis}.pdf")
}

/// Final reports must be PDFs.
///
/// Clients that send no specific MIME type are judged by the extension.
pub fn validate_final_report(file_name: &str, content_type: &str) -> Result<(), CoreError> {
    let is_pdf = match content_type {
        CONTENT_TYPE_PDF => true,
        "" | CONTENT_TYPE_OCTET_STREAM => file_extension(file_name) == "pdf",
        _ => false,
    };
    if is_pdf {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Please select a PDF file only.".into(),
        ))
    }
}

/// Object paths must stay inside their bucket.
pub fn validate_object_path(path: &str) -> Result<(), CoreError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if invalid {
        return Err(CoreError::Validation(format!("Invalid object path '{path}'")));
    }
    Ok(())
}

/// Bucket names must be ones the service knows about.
pub fn validate_bucket(bucket: &str) -> Result<(), CoreError> {
    if KNOWN_BUCKETS.contains(&bucket) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Unknown bucket '{bucket}'")))
    }
}

/// Project that owns an object, read from the path convention of its bucket.
///
/// Section files live under `uploads/{project_id}/...`; final reports under
/// `{project_id}/...`.
pub fn project_id_from_object_path(bucket: &str, path: &str) -> Option<DbId> {
    let mut segments = path.split('/');
    let id_segment = match bucket {
        PROJECT_FILES_BUCKET => match segments.next() {
            Some("uploads") => segments.next(),
            _ => None,
        },
        FINAL_REPORTS_BUCKET => segments.next(),
        _ => None,
    }?;
    id_segment.parse().ok()
}

/// `Content-Type` to serve a stored object with, from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match file_extension(file_name).as_str() {
        "pdf" => CONTENT_TYPE_PDF,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain; charset=utf-8",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => CONTENT_TYPE_OCTET_STREAM,
    }
}

// ---------------------------------------------------------------------------
// Preview dispatch
// ---------------------------------------------------------------------------

/// How a client should render a file inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    /// Native `<img>` render.
    Image,
    /// Browser PDF viewer in an iframe.
    PdfViewer,
    /// Third-party online office viewer in an iframe.
    OfficeViewer,
    /// Plain text in an iframe.
    Text,
    /// No inline preview; offer a download.
    DownloadOnly,
}

/// A preview descriptor for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePreview {
    pub kind: PreviewKind,
    /// What to load inline. `None` for download-only.
    pub src: Option<String>,
    /// Where the raw file can always be fetched from.
    pub download_url: String,
}

impl FilePreview {
    /// Descriptor to switch to when the inline viewer fails to load.
    pub fn fallback(&self) -> FilePreview {
        FilePreview {
            kind: PreviewKind::DownloadOnly,
            src: None,
            download_url: self.download_url.clone(),
        }
    }
}

/// Choose a preview strategy from the file name's extension (case-insensitive).
pub fn preview_for(file_name: &str, url: &str) -> FilePreview {
    let ext = file_extension(file_name);
    let (kind, src) = match ext.as_str() {
        "pdf" => (PreviewKind::PdfViewer, Some(format!("{url}#toolbar=0"))),
        e if IMAGE_EXTENSIONS.contains(&e) => (PreviewKind::Image, Some(url.to_string())),
        e if OFFICE_EXTENSIONS.contains(&e) => (
            PreviewKind::OfficeViewer,
            Some(format!(
                "{OFFICE_VIEWER_BASE}?url={}&embedded=true",
                urlencoding::encode(url)
            )),
        ),
        "txt" => (PreviewKind::Text, Some(url.to_string())),
        _ => (PreviewKind::DownloadOnly, None),
    };
    FilePreview {
        kind,
        src,
        download_url: url.to_string(),
    }
}
