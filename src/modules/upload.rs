//! Multipart form collection shared by the upload endpoints.

use std::collections::HashMap;

use axum::{extract::Multipart, http::StatusCode};

use super::{error_response, ApiError};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Browsers send an empty, unnamed part when no file was chosen.
    pub fn is_placeholder(&self) -> bool {
        self.bytes.is_empty() && self.file_name.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, format!("Failed to read multipart: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if field.file_name().is_some() {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e))
                })?;

                form.files.push(UploadedFile {
                    field: name,
                    file_name,
                    content_type,
                    bytes: data.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, format!("Failed to read field: {}", e))
                })?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// First real file uploaded under any of `names`.
    pub fn take_file(&mut self, names: &[&str]) -> Option<UploadedFile> {
        let index = self
            .files
            .iter()
            .position(|f| names.contains(&f.field.as_str()) && !f.is_placeholder())?;
        Some(self.files.remove(index))
    }

    /// Every real file under `name`. `None` when the form has no such part at
    /// all, an empty list when only placeholders were sent.
    pub fn take_files(&mut self, name: &str) -> Option<Vec<UploadedFile>> {
        let present = self.files.iter().any(|f| f.field == name) || self.fields.contains_key(name);
        if !present {
            return None;
        }

        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field == name);
        self.files = rest;

        Some(taken.into_iter().filter(|f| !f.is_placeholder()).collect())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str).filter(|v| !v.trim().is_empty())
    }
}
