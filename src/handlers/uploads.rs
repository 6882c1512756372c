//! Multipart upload endpoint backed by object storage.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use futures_util::TryStreamExt;
use serde_json::json;

use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::storage::storage_service::StorageService;

// Course videos dominate upload traffic; anything bigger belongs in a
// resumable flow, not a single multipart request.
const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Accepts one file field and stores it under the given folder. Responds
/// with the public URL so the client can attach it to a course or profile.
#[post("/{folder}")]
pub async fn upload(
    folder: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut file_name: Option<String> = None;
    let mut content_type = "application/octet-stream".to_string();
    let mut data: Vec<u8> = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart payload: {}", e)))?
    {
        if let Some(disposition) = field.content_disposition() {
            if let Some(name) = disposition.get_filename() {
                file_name = Some(name.to_string());
            }
        }
        if let Some(mime) = field.content_type() {
            content_type = mime.to_string();
        }

        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Upload interrupted: {}", e)))?
        {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::ValidationError(
                    "File exceeds the upload size limit".to_string(),
                ));
            }
            data.extend_from_slice(&chunk);
        }
    }

    let file_name =
        file_name.ok_or_else(|| AppError::ValidationError("No file in request".to_string()))?;
    if data.is_empty() {
        return Err(AppError::ValidationError("Uploaded file is empty".to_string()));
    }

    let url = StorageService::instance()
        .upload(&folder, &file_name, &content_type, data)
        .await?;

    Ok(ApiResponse::created(
        "File uploaded",
        json!({ "url": url, "fileName": file_name }),
    ))
}
