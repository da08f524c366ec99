//! Uploaded file storage.
//!
//! Files live in named buckets and are addressed by the public URL returned at
//! upload time. Records only keep that URL, so deletion works from it too.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod local;

pub use local::LocalAssetStore;

/// Maximum upload size (10 MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetBucket {
    #[serde(rename = "notice-pdfs")]
    NoticePdfs,
    #[serde(rename = "gallery-photos")]
    GalleryPhotos,
}

impl AssetBucket {
    pub const ALL: [AssetBucket; 2] = [AssetBucket::NoticePdfs, AssetBucket::GalleryPhotos];

    pub fn name(self) -> &'static str {
        match self {
            AssetBucket::NoticePdfs => "notice-pdfs",
            AssetBucket::GalleryPhotos => "gallery-photos",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.name() == name)
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            AssetBucket::NoticePdfs => &["pdf"],
            AssetBucket::GalleryPhotos => &["jpg", "jpeg", "png", "gif", "webp"],
        }
    }
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores `data` and returns the URL it can be fetched from.
    async fn store(&self, bucket: AssetBucket, filename: &str, data: &[u8]) -> Result<String>;

    /// Removes the file behind `url`. Returns `Ok(false)` when the URL does not
    /// point into this store, in which case nothing is touched.
    async fn delete_by_url(&self, url: &str) -> Result<bool>;
}
