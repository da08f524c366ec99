use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::{
    domain::{normalize_pdf_url, NewNotice, Notice},
    error::{AppError, Result},
    repository::NoticeRepository,
    service::{cleanup_asset, DeleteOutcome},
    storage::AssetStore,
    visibility::{
        timestamp::{format_publish_time, parse_date, parse_publish_time, DATE_FORMAT},
        AdminNotice, BoardClock, BoardState, BoardView, SortOrder, VisibilityEngine,
    },
};

/// When a new or edited notice goes up.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PublishMode {
    #[default]
    Now,
    Scheduled { at: String },
}

/// Admin input for creating or editing a notice.
#[derive(Debug, Clone, Deserialize)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub publish: PublishMode,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

pub struct NoticeService {
    repo: Arc<dyn NoticeRepository>,
    assets: Arc<dyn AssetStore>,
    engine: VisibilityEngine,
    clock: BoardClock,
}

impl NoticeService {
    pub fn new(
        repo: Arc<dyn NoticeRepository>,
        assets: Arc<dyn AssetStore>,
        engine: VisibilityEngine,
        clock: BoardClock,
    ) -> Self {
        Self { repo, assets, engine, clock }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// The public board for the caller's controls, as of now.
    pub async fn board(&self, state: &BoardState) -> Result<BoardView> {
        self.board_at(state, self.now()).await
    }

    pub async fn board_at(&self, state: &BoardState, now: NaiveDateTime) -> Result<BoardView> {
        let notices = self.repo.list().await?;
        Ok(state.evaluate(&self.engine, &notices, now))
    }

    /// A single notice, only if it is currently on the board.
    pub async fn find_visible(&self, id: i64) -> Result<Notice> {
        let not_found = || AppError::NotFound("Notice not found".to_string());
        let notice = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        self.engine
            .compute_visible_notices(std::slice::from_ref(&notice), self.now(), SortOrder::default(), None)
            .into_vec()
            .pop()
            .ok_or_else(not_found)
    }

    pub async fn admin_list(&self) -> Result<Vec<AdminNotice>> {
        let notices = self.repo.list().await?;
        Ok(self.engine.annotate_for_admin(&notices, self.now()))
    }

    pub async fn create(&self, draft: NoticeDraft) -> Result<Notice> {
        self.create_at(draft, self.now()).await
    }

    pub async fn create_at(&self, draft: NoticeDraft, now: NaiveDateTime) -> Result<Notice> {
        let notice = resolve_draft(draft, None, now)?;
        let created = self.repo.create(notice).await?;
        tracing::info!(notice_id = created.id, publish_date_time = %created.publish_date_time, "Notice created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, draft: NoticeDraft) -> Result<Notice> {
        self.update_at(id, draft, self.now()).await
    }

    /// Edits a notice. Once a notice has been published its publish time is fixed,
    /// whatever the draft asks for.
    pub async fn update_at(&self, id: i64, draft: NoticeDraft, now: NaiveDateTime) -> Result<Notice> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notice not found".to_string()))?;

        let notice = resolve_draft(draft, Some(&existing), now)?;
        let updated = self.repo.update(id, notice).await?;
        tracing::info!(notice_id = id, "Notice updated");
        Ok(updated)
    }

    /// Deletes the record, then makes a best-effort attempt at its PDF.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notice not found".to_string()))?;

        self.repo.delete(id).await?;
        let asset = cleanup_asset(self.assets.as_ref(), existing.pdf_url.as_deref()).await;
        tracing::info!(notice_id = id, ?asset, "Notice deleted");

        Ok(DeleteOutcome { id, asset })
    }
}

fn require_text(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn resolve_draft(draft: NoticeDraft, existing: Option<&Notice>, now: NaiveDateTime) -> Result<NewNotice> {
    let title = require_text("title", draft.title)?;
    let content = require_text("content", draft.content)?;
    let author = require_text("author", draft.author)?;

    let already_published = existing
        .and_then(|notice| notice.published_at().map(|at| (notice, at)))
        .filter(|(_, at)| *at <= now);

    let publish_date_time = match (already_published, draft.publish) {
        (Some((notice, _)), _) => notice.publish_date_time.clone(),
        (None, PublishMode::Now) => format_publish_time(now),
        (None, PublishMode::Scheduled { at }) => {
            let parsed = parse_publish_time(&at).ok_or_else(|| {
                AppError::Validation(format!("Invalid publish time '{}', expected YYYY-MM-DDTHH:MM", at))
            })?;
            format_publish_time(parsed)
        }
    };

    let expiry_date = match draft.expiry_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let parsed = parse_date(raw).ok_or_else(|| {
                AppError::Validation(format!("Invalid expiry date '{}', expected YYYY-MM-DD", raw))
            })?;
            Some(parsed.format(DATE_FORMAT).to_string())
        }
    };

    Ok(NewNotice {
        title,
        content,
        author,
        publish_date_time,
        is_urgent: draft.is_urgent,
        pdf_url: normalize_pdf_url(draft.pdf_url),
        expiry_date,
    })
}
