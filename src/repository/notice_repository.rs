use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::{NewNotice, Notice},
    error::{AppError, Result},
    repository::NoticeRepository,
};

#[derive(FromRow)]
struct NoticeRow {
    id: i64,
    title: String,
    content: String,
    author: String,
    publish_date_time: String,
    is_urgent: i32,
    pdf_url: Option<String>,
    expiry_date: Option<String>,
    created_at: NaiveDateTime,
}

impl From<NoticeRow> for Notice {
    fn from(row: NoticeRow) -> Self {
        Notice {
            id: row.id,
            title: row.title,
            content: row.content,
            author: row.author,
            publish_date_time: row.publish_date_time,
            is_urgent: row.is_urgent != 0,
            pdf_url: row.pdf_url,
            expiry_date: row.expiry_date,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        }
    }
}

pub struct SqliteNoticeRepository {
    pool: SqlitePool,
}

impl SqliteNoticeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeRepository for SqliteNoticeRepository {
    async fn create(&self, notice: NewNotice) -> Result<Notice> {
        let is_urgent_int = if notice.is_urgent { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO notices (
                title, content, author, publish_date_time, is_urgent,
                pdf_url, expiry_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&notice.title)
        .bind(&notice.content)
        .bind(&notice.author)
        .bind(&notice.publish_date_time)
        .bind(is_urgent_int)
        .bind(&notice.pdf_url)
        .bind(&notice.expiry_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created notice".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Notice>> {
        let row = sqlx::query_as::<_, NoticeRow>(
            r#"
            SELECT id, title, content, author, publish_date_time, is_urgent,
                   pdf_url, expiry_date, created_at
            FROM notices
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Notice::from))
    }

    async fn list(&self) -> Result<Vec<Notice>> {
        let rows = sqlx::query_as::<_, NoticeRow>(
            r#"
            SELECT id, title, content, author, publish_date_time, is_urgent,
                   pdf_url, expiry_date, created_at
            FROM notices
            ORDER BY publish_date_time DESC, id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Notice::from).collect())
    }

    async fn update(&self, id: i64, notice: NewNotice) -> Result<Notice> {
        let is_urgent_int = if notice.is_urgent { 1i32 } else { 0i32 };

        let result = sqlx::query(
            r#"
            UPDATE notices
            SET title = ?, content = ?, author = ?, publish_date_time = ?,
                is_urgent = ?, pdf_url = ?, expiry_date = ?
            WHERE id = ?
            "#
        )
        .bind(&notice.title)
        .bind(&notice.content)
        .bind(&notice.author)
        .bind(&notice.publish_date_time)
        .bind(is_urgent_int)
        .bind(&notice.pdf_url)
        .bind(&notice.expiry_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notice not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated notice".to_string())
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM notices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notice not found".to_string()));
        }

        Ok(())
    }
}
