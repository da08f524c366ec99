use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    api::state::AppState,
    error::{AppError, Result},
    storage::AssetBucket,
};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Accepts a single multipart `file` field and stores it in the named bucket.
pub async fn upload(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let bucket = AssetBucket::from_name(&bucket)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown bucket '{}'", bucket)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("Uploaded file has no name".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        let url = state.service_context.asset_store.store(bucket, &filename, &data).await?;
        tracing::info!(bucket = bucket.name(), %url, "File uploaded");

        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(AppError::Validation("Missing 'file' field".to_string()))
}
