pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{get, post, put, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
    storage::MAX_FILE_SIZE,
};
use state::AppState;

/// Multipart framing on top of the largest accepted file.
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 64 * 1024;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let uploads = ServeDir::new(&settings.server.uploads_dir);
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Health and info
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Admin login
        .nest("/auth", auth_routes())

        // Board, gallery and admin API
        .nest("/api", api_routes(app_state.clone()))

        // Uploaded PDFs and photos
        .nest_service("/uploads", uploads)

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/status", get(handlers::auth::status))
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/notices", get(handlers::notices::board))
        .route("/notices/:id", get(handlers::notices::get))
        .route("/photos", get(handlers::photos::list))
        .nest("/admin", admin_routes(state))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/notices", get(handlers::notices::admin_list))
        .route("/notices", post(handlers::notices::create))
        .route("/notices/:id", put(handlers::notices::update))
        .route("/notices/:id", delete(handlers::notices::delete))
        .route("/photos", post(handlers::photos::create))
        .route("/photos/:id", delete(handlers::photos::delete))
        .route(
            "/uploads/:bucket",
            post(handlers::uploads::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
