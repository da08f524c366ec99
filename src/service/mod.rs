pub mod notice_service;
pub mod photo_service;

use std::sync::Arc;
use serde::Serialize;

use crate::auth::AuthService;
use crate::config::BoardConfig;
use crate::repository::*;
use crate::storage::AssetStore;
use crate::visibility::{BoardClock, VisibilityEngine};
use notice_service::NoticeService;
use photo_service::PhotoService;

pub use notice_service::{NoticeDraft, PublishMode};

pub struct ServiceContext {
    pub notice_repo: Arc<dyn NoticeRepository>,
    pub photo_repo: Arc<dyn PhotoRepository>,
    pub asset_store: Arc<dyn AssetStore>,
    pub auth_service: Arc<AuthService>,
    pub notice_service: Arc<NoticeService>,
    pub photo_service: Arc<PhotoService>,
}

impl ServiceContext {
    pub fn new(
        notice_repo: Arc<dyn NoticeRepository>,
        photo_repo: Arc<dyn PhotoRepository>,
        asset_store: Arc<dyn AssetStore>,
        auth_service: Arc<AuthService>,
        board: &BoardConfig,
    ) -> Self {
        let engine = VisibilityEngine::new(board.policy());
        let clock = BoardClock::from_offset_minutes(board.utc_offset_minutes);

        let notice_service = Arc::new(NoticeService::new(
            notice_repo.clone(),
            asset_store.clone(),
            engine,
            clock,
        ));
        let photo_service = Arc::new(PhotoService::new(photo_repo.clone(), asset_store.clone()));

        Self {
            notice_repo,
            photo_repo,
            asset_store,
            auth_service,
            notice_service,
            photo_service,
        }
    }
}

/// What happened to a record's attached file after the record was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCleanup {
    /// The record had no attachment.
    NoAsset,
    Removed,
    /// The attachment lives outside our store and was left alone.
    External,
    /// Removing the file failed; the record is gone regardless.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub id: i64,
    pub asset: AssetCleanup,
}

/// Best-effort removal of a deleted record's file. Failures are logged, never returned.
pub(crate) async fn cleanup_asset(assets: &dyn AssetStore, url: Option<&str>) -> AssetCleanup {
    let Some(url) = url else {
        return AssetCleanup::NoAsset;
    };

    match assets.delete_by_url(url).await {
        Ok(true) => AssetCleanup::Removed,
        Ok(false) => AssetCleanup::External,
        Err(e) => {
            tracing::warn!(url, error = %e, "Failed to delete asset, record already removed");
            AssetCleanup::Failed
        }
    }
}
