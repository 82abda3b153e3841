use std::path::PathBuf;

use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{errors::AppError, utils::file_names::file_extension};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Image {
    pub id: i64,
    pub filename: String, // display name as uploaded
    pub path: String,     // location on the file store
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ImageInsert {
    pub filename: String,
    pub path: String,
    pub size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, MultipartForm)]
pub struct ImageUploadForm {
    #[multipart(rename = "image")]
    pub image: Option<TempFile>,
}

/// A received file part, still sitting at `source` until the file store
/// copies it in.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub size: u64,
    pub source: PathBuf,
}

/// An image record together with its opened payload.
#[derive(Debug)]
pub struct ImageFile {
    pub image: Image,
    pub file: tokio::fs::File,
}

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size: u64,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn check_size(&self, declared_size: u64) -> Result<(), AppError> {
        if declared_size > self.max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.max_size
            )));
        }
        Ok(())
    }

    /// Extension match is case-sensitive and taken verbatim from the name.
    pub fn check_extension<'a>(&self, filename: &'a str) -> Result<&'a str, AppError> {
        let ext = file_extension(filename);
        if ext.is_empty() || !self.allowed_extensions.iter().any(|allowed| allowed == ext) {
            return Err(AppError::UnsupportedMediaType("File type not allowed".into()));
        }
        Ok(ext)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        UploadPolicy {
            max_size: 10 * 1024 * 1024,
            allowed_extensions: [".jpg", ".jpeg", ".png", ".gif", ".webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}
