use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod notice_repository;
pub mod photo_repository;

pub use notice_repository::SqliteNoticeRepository;
pub use photo_repository::SqlitePhotoRepository;

#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn create(&self, notice: NewNotice) -> Result<Notice>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Notice>>;
    /// Full snapshot of every notice, in no particular order.
    async fn list(&self) -> Result<Vec<Notice>>;
    async fn update(&self, id: i64, notice: NewNotice) -> Result<Notice>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create(&self, photo: NewPhoto) -> Result<Photo>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>>;
    /// Every photo, newest first.
    async fn list(&self) -> Result<Vec<Photo>>;
    async fn delete(&self, id: i64) -> Result<()>;
}
