use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{AssetBucket, AssetStore, MAX_FILE_SIZE};
use crate::error::{AppError, Result};

/// Assets kept on local disk under `<root>/<bucket>/`, served at
/// `<base_url>/uploads/<bucket>/<file>`.
pub struct LocalAssetStore {
    root: PathBuf,
    public_base: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base: format!("{}/uploads", base_url.trim_end_matches('/')),
        }
    }

    fn public_url(&self, bucket: AssetBucket, stored_name: &str) -> String {
        format!("{}/{}/{}", self.public_base, bucket.name(), stored_name)
    }

    /// Resolves a public URL back to a file path, if it is one of ours.
    fn locate(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(&self.public_base)?.strip_prefix('/')?;
        let (bucket_name, file) = rest.split_once('/')?;
        let bucket = AssetBucket::from_name(bucket_name)?;

        if file.is_empty() || file.contains('/') || file.contains('\\') || file.starts_with('.') {
            return None;
        }

        Some(self.root.join(bucket.name()).join(file))
    }
}

/// Extension of `filename`, lower-cased, if it is allowed for `bucket`.
fn checked_extension(bucket: AssetBucket, filename: &str) -> Result<String> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or_else(|| AppError::Validation("Invalid filename".to_string()))?;

    if !bucket.allowed_extensions().contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid file type. Allowed: {}",
            bucket.allowed_extensions().join(", ")
        )));
    }

    Ok(extension)
}

/// Last path component of a client-supplied name, restricted to a safe alphabet.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);

    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, bucket: AssetBucket, filename: &str, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation("File too large (max 10 MB)".to_string()));
        }

        checked_extension(bucket, filename)?;

        let bucket_dir = self.root.join(bucket.name());
        fs::create_dir_all(&bucket_dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create upload directory: {}", e))
        })?;

        let safe_name = sanitize_filename(filename);
        let stamp = Utc::now().timestamp_millis();

        // Same-millisecond uploads of the same name get a counter.
        let mut attempt = 0u32;
        let (stored_name, mut file) = loop {
            let candidate = if attempt == 0 {
                format!("{}-{}", stamp, safe_name)
            } else {
                format!("{}-{}-{}", stamp, attempt, safe_name)
            };

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(bucket_dir.join(&candidate))
                .await
            {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && attempt < 16 => {
                    attempt += 1;
                }
                Err(e) => {
                    return Err(AppError::Storage(format!("Failed to create file: {}", e)));
                }
            }
        };

        file.write_all(data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file: {}", e))
        })?;
        file.flush().await?;

        tracing::info!(bucket = bucket.name(), file = %stored_name, bytes = data.len(), "stored upload");

        Ok(self.public_url(bucket, &stored_name))
    }

    async fn delete_by_url(&self, url: &str) -> Result<bool> {
        let Some(path) = self.locate(url) else {
            tracing::debug!(url, "not a local asset, skipping delete");
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "asset already gone");
                Ok(true)
            }
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {}", e))),
        }
    }
}
