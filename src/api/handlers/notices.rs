use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    api::{middleware::auth::AdminSession, state::AppState},
    domain::Notice,
    error::{AppError, Result},
    service::{DeleteOutcome, NoticeDraft},
    visibility::{timestamp::parse_date, AdminNotice, BoardState, BoardView, SortOrder},
};

/// Board controls as query parameters. `start`/`end` only take effect with `filter=true`.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub sort: Option<SortOrder>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub filter: Option<bool>,
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid {} date '{}', expected YYYY-MM-DD", name, value))
        }),
    }
}

impl BoardQuery {
    pub fn into_state(self) -> Result<BoardState> {
        let mut state = BoardState::new(self.sort.unwrap_or_default());
        state.set_start(parse_bound("start", self.start.as_deref())?);
        state.set_end(parse_bound("end", self.end.as_deref())?);
        if self.filter.unwrap_or(false) {
            state.apply_filter();
        }
        Ok(state)
    }
}

pub async fn board(
    State(state): State<AppState>,
    Query(params): Query<BoardQuery>,
) -> Result<Json<BoardView>> {
    let board_state = params.into_state()?;
    let view = state.service_context.notice_service.board(&board_state).await?;
    Ok(Json(view))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notice>> {
    let notice = state.service_context.notice_service.find_visible(id).await?;
    Ok(Json(notice))
}

pub async fn admin_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminNotice>>> {
    let notices = state.service_context.notice_service.admin_list().await?;
    Ok(Json(notices))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Json(draft): Json<NoticeDraft>,
) -> Result<(StatusCode, Json<Notice>)> {
    tracing::debug!(session_id = %admin.session_id, "Creating notice");
    let notice = state.service_context.notice_service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(notice)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(admin): Extension<AdminSession>,
    Json(draft): Json<NoticeDraft>,
) -> Result<Json<Notice>> {
    tracing::debug!(session_id = %admin.session_id, notice_id = id, "Updating notice");
    let notice = state.service_context.notice_service.update(id, draft).await?;
    Ok(Json(notice))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(admin): Extension<AdminSession>,
) -> Result<Json<DeleteOutcome>> {
    tracing::debug!(session_id = %admin.session_id, notice_id = id, "Deleting notice");
    let outcome = state.service_context.notice_service.delete(id).await?;
    Ok(Json(outcome))
}
