use std::sync::Arc;

use crate::{
    domain::{NewPhoto, Photo},
    error::{AppError, Result},
    repository::PhotoRepository,
    service::{cleanup_asset, DeleteOutcome},
    storage::AssetStore,
};

pub struct PhotoService {
    repo: Arc<dyn PhotoRepository>,
    assets: Arc<dyn AssetStore>,
}

impl PhotoService {
    pub fn new(repo: Arc<dyn PhotoRepository>, assets: Arc<dyn AssetStore>) -> Self {
        Self { repo, assets }
    }

    /// The gallery, newest first.
    pub async fn list(&self) -> Result<Vec<Photo>> {
        self.repo.list().await
    }

    pub async fn create(&self, photo: NewPhoto) -> Result<Photo> {
        let url = photo.url.trim().to_string();
        let caption = photo.caption.trim().to_string();

        if url.is_empty() || caption.is_empty() {
            return Err(AppError::Validation(
                "A photo needs both an uploaded image and a caption".to_string(),
            ));
        }

        let created = self.repo.create(NewPhoto { url, caption }).await?;
        tracing::info!(photo_id = created.id, "Photo added");
        Ok(created)
    }

    /// Deletes the record, then makes a best-effort attempt at the image file.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        self.repo.delete(id).await?;
        let asset = cleanup_asset(self.assets.as_ref(), Some(existing.url.as_str())).await;
        tracing::info!(photo_id = id, ?asset, "Photo deleted");

        Ok(DeleteOutcome { id, asset })
    }
}
