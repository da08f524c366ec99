use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{NewPhoto, Photo},
    error::{AppError, Result},
    repository::PhotoRepository,
};

#[derive(FromRow)]
struct PhotoRow {
    id: i64,
    url: String,
    caption: String,
    created_at: NaiveDateTime,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: row.id,
            url: row.url,
            caption: row.caption,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        }
    }
}

pub struct SqlitePhotoRepository {
    pool: SqlitePool,
}

impl SqlitePhotoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for SqlitePhotoRepository {
    async fn create(&self, photo: NewPhoto) -> Result<Photo> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query("INSERT INTO photos (url, caption, created_at) VALUES (?, ?, ?)")
            .bind(&photo.url)
            .bind(&photo.caption)
            .bind(now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created photo".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>> {
        let row = sqlx::query_as::<_, PhotoRow>(
            "SELECT id, url, caption, created_at FROM photos WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Photo::from))
    }

    async fn list(&self) -> Result<Vec<Photo>> {
        // Ids are assigned in insertion order, so they settle same-instant ties.
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, url, caption, created_at
            FROM photos
            ORDER BY created_at DESC, id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Photo not found".to_string()));
        }

        Ok(())
    }
}
