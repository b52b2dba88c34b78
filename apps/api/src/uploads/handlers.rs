use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::{object_key, public_url};

/// Request bodies above this size are rejected before reaching the handler.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

struct UploadedFile {
    file_name: String,
    content_type: String,
    data: Bytes,
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}

/// POST /api/v1/uploads (multipart, field `file`)
///
/// Stores the image as-is and returns its public URL.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_file_field(&mut multipart)
        .await?
        .filter(|f| !f.data.is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    if !file.content_type.starts_with("image/") {
        return Err(AppError::Validation(format!(
            "Only image uploads are supported (got '{}')",
            file.content_type
        )));
    }

    let key = object_key(&file.file_name, Utc::now());
    let size = file.data.len();

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(file.data))
        .content_type(&file.content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    info!(
        "Uploaded {size} bytes to s3://{}/{}",
        state.config.s3_bucket, key
    );

    Ok(Json(UploadResponse {
        url: public_url(&state.config.s3_public_url, &state.config.s3_bucket, &key),
    }))
}
