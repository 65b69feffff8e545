//! Reading multipart form submissions.

use std::collections::HashMap;

use axum::extract::Multipart;
use fyptrack_core::files::CONTENT_TYPE_OCTET_STREAM;
use fyptrack_core::storage::PendingUpload;

use crate::error::{AppError, AppResult};

/// A fully-buffered multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Text fields by name. A repeated name keeps the last value.
    pub fields: HashMap<String, String>,
    /// File parts in arrival order, with the form field they came from.
    pub files: Vec<(String, PendingUpload)>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Files sent under one field name.
    pub fn take_files(&mut self, name: &str) -> Vec<PendingUpload> {
        let (wanted, rest) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        wanted.into_iter().map(|(_, upload)| upload).collect()
    }
}

/// Buffer every part of a multipart body.
///
/// Parts with a file name are files; the rest are text. Empty file parts with
/// no name are what browsers send for an untouched file input and are skipped.
pub async fn read_form(mut multipart: Multipart) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .unwrap_or(CONTENT_TYPE_OCTET_STREAM)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.push((
                    name,
                    PendingUpload {
                        name: file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                ));
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
