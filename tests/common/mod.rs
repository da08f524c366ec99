#![allow(dead_code)]

use std::sync::Arc;

use noticeboard::{
    auth::{Argon2Verifier, AuthService},
    config::Settings,
    repository::{SqliteNoticeRepository, SqlitePhotoRepository},
    service::ServiceContext,
    storage::LocalAssetStore,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;

pub const BASE_URL: &str = "http://board.test";

pub struct TestApp {
    pub pool: SqlitePool,
    pub context: Arc<ServiceContext>,
    pub settings: Arc<Settings>,
    pub uploads: TempDir,
}

/// A single-connection in-memory database with migrations applied.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub async fn setup(admin_password_hash: Option<String>) -> anyhow::Result<TestApp> {
    let pool = test_pool().await?;
    let uploads = tempfile::tempdir()?;

    let mut settings = Settings::default();
    settings.server.base_url = BASE_URL.to_string();
    settings.server.uploads_dir = uploads.path().to_string_lossy().into_owned();
    settings.auth.admin_password_hash = admin_password_hash.clone();

    let auth_service = Arc::new(AuthService::new(
        pool.clone(),
        Arc::new(Argon2Verifier::new(admin_password_hash)),
        settings.auth.session_duration_hours,
    ));

    let context = Arc::new(ServiceContext::new(
        Arc::new(SqliteNoticeRepository::new(pool.clone())),
        Arc::new(SqlitePhotoRepository::new(pool.clone())),
        Arc::new(LocalAssetStore::new(uploads.path(), BASE_URL)),
        auth_service,
        &settings.board,
    ));

    Ok(TestApp {
        pool,
        context,
        settings: Arc::new(settings),
        uploads,
    })
}
