use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

pub mod session;

use session::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "admin_session";

/// Decides whether a submitted admin credential is correct.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, submitted: &str) -> Result<bool>;
}

/// Checks the shared admin password against a configured Argon2 hash.
pub struct Argon2Verifier {
    hash: Option<String>,
}

impl Argon2Verifier {
    pub fn new(hash: Option<String>) -> Self {
        Self { hash }
    }

    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn verify(&self, submitted: &str) -> Result<bool> {
        let Some(hash) = self.hash.as_deref() else {
            tracing::warn!("No admin password hash configured, refusing login");
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(submitted.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

pub struct AuthService {
    session_store: SessionStore,
    verifier: Arc<dyn CredentialVerifier>,
    session_duration_hours: i64,
}

impl AuthService {
    pub fn new(
        pool: SqlitePool,
        verifier: Arc<dyn CredentialVerifier>,
        session_duration_hours: i64,
    ) -> Self {
        Self {
            session_store: SessionStore::new(pool),
            verifier,
            session_duration_hours,
        }
    }

    /// Checks the credential and opens an admin session.
    /// Returns the raw token to hand to the client.
    pub async fn login(&self, password: &str) -> Result<String> {
        if !self.verifier.verify(password)? {
            tracing::info!("Rejected admin login");
            return Err(AppError::Unauthorized);
        }

        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);
        let session = self.session_store.create(&token, expires_at).await?;

        tracing::info!(session_id = %session.id, "Admin session opened");
        Ok(token)
    }

    pub async fn validate_session(&self, token: &str) -> Result<Option<Session>> {
        self.session_store.find_by_token(token).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.delete_by_token(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str, secure: bool) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(secure)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

pub(crate) fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
