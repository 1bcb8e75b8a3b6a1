//! Request handlers, one module per resource.

pub mod catalog;
pub mod condition_grades;
pub mod pricing;
pub mod price_tables;

use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

/// Multipart field carrying the uploaded spreadsheet.
pub const UPLOAD_FIELD: &str = "file";

/// An uploaded spreadsheet.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read the `file` field of a multipart upload. Other fields are ignored.
pub async fn read_upload(mut multipart: Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Uploaded file has no file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}
