use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noticeboard::{
    api,
    auth::{Argon2Verifier, AuthService},
    config::Settings,
    repository::{SqliteNoticeRepository, SqlitePhotoRepository},
    service::ServiceContext,
    storage::LocalAssetStore,
};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noticeboard=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting noticeboard server on {}:{}", settings.server.host, settings.server.port);

    if settings.auth.admin_password_hash.is_none() {
        tracing::warn!("auth.admin_password_hash is not set; admin login is disabled");
    }

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Initialize auth service
    let verifier = Arc::new(Argon2Verifier::new(settings.auth.admin_password_hash.clone()));
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        verifier,
        settings.auth.session_duration_hours,
    ));

    // Initialize repositories and file storage
    let notice_repo = Arc::new(SqliteNoticeRepository::new(db_pool.clone()));
    let photo_repo = Arc::new(SqlitePhotoRepository::new(db_pool.clone()));
    let asset_store = Arc::new(LocalAssetStore::new(
        settings.server.uploads_dir.clone(),
        &settings.server.base_url,
    ));

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        notice_repo,
        photo_repo,
        asset_store,
        auth_service.clone(),
        &settings.board,
    ));

    // Periodically drop expired admin sessions
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match auth_service.cleanup_expired_sessions().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Removed {} expired admin sessions", removed),
                Err(e) => tracing::warn!("Session cleanup failed: {}", e),
            }
        }
    });

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
