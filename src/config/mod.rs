use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

use crate::visibility::{MalformedExpiry, MalformedTimestamp, VisibilityPolicy};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// PHC-format Argon2 hash of the shared admin password.
    /// Login is refused for everyone while this is unset.
    pub admin_password_hash: Option<String>,
    pub session_duration_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,
}

/// Board-wide visibility settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BoardConfig {
    /// Offset of the building's local time from UTC, in minutes.
    /// Publish times and expiry dates are read as wall-clock times in this zone.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub malformed_timestamp: MalformedTimestamp,
    #[serde(default)]
    pub malformed_expiry: MalformedExpiry,
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

impl BoardConfig {
    pub fn policy(&self) -> VisibilityPolicy {
        VisibilityPolicy {
            malformed_timestamp: self.malformed_timestamp,
            malformed_expiry: self.malformed_expiry,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("server.uploads_dir", "uploads")?
            .set_default("database.url", "sqlite://noticeboard.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("auth.secure_cookies", false)?
            .set_default("board.utc_offset_minutes", 0)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Environment variables (NOTICEBOARD__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("NOTICEBOARD").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
                uploads_dir: default_uploads_dir(),
            },
            database: DatabaseConfig {
                url: "sqlite://noticeboard.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                admin_password_hash: None,
                session_duration_hours: 24,
                secure_cookies: false,
            },
            board: BoardConfig::default(),
        }
    }
}
