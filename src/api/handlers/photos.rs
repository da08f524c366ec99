use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    domain::{NewPhoto, Photo},
    error::Result,
    service::DeleteOutcome,
};

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Photo>>> {
    let photos = state.service_context.photo_service.list().await?;
    Ok(Json(photos))
}

pub async fn create(
    State(state): State<AppState>,
    Json(photo): Json<NewPhoto>,
) -> Result<(StatusCode, Json<Photo>)> {
    let photo = state.service_context.photo_service.create(photo).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteOutcome>> {
    let outcome = state.service_context.photo_service.delete(id).await?;
    Ok(Json(outcome))
}
