use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    auth::{AuthService, SESSION_COOKIE},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthStatus>)> {
    let auth_service = &state.service_context.auth_service;
    let token = auth_service.login(&req.password).await?;

    let cookie = auth_service.create_session_cookie(&token, state.settings.auth.secure_cookies);

    Ok((jar.add(cookie), Json(AuthStatus { authenticated: true })))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await
        {
            tracing::warn!("Failed to invalidate session on logout: {}", e);
        }
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}

pub async fn status(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AuthStatus>> {
    let authenticated = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.service_context.auth_service
            .validate_session(cookie.value())
            .await?
            .is_some(),
        None => false,
    };

    Ok(Json(AuthStatus { authenticated }))
}
