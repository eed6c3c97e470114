//! API server configuration.

use std::fmt;
use std::path::PathBuf;

use chrono::Duration;
use petconnect_core::auth::IdentityKey;
use petconnect_core::auth::password::BCRYPT_COST;

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Default upload size limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Origins of the local web client dev servers.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:3000",
];

/// Configuration for the API server. Fixed for the life of the process.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL; `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Token signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// Which principal field logins and token subjects use.
    pub identity_key: IdentityKey,
    /// Directory for uploaded files.
    pub upload_dir: PathBuf,
    /// Largest accepted request body on the upload route.
    pub max_upload_bytes: usize,
    /// Origins allowed by CORS. Credentials are allowed for these.
    pub cors_allowed_origins: Vec<String>,
    /// bcrypt cost used when hashing new passwords.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Configuration with defaults for everything but the signing secret.
    ///
    /// | Field                  | Default                         |
    /// |------------------------|---------------------------------|
    /// | `bind_addr`            | `127.0.0.1:8080`                |
    /// | `database_url`         | none (in-memory store)          |
    /// | `token_ttl`            | 24 hours                        |
    /// | `identity_key`         | `username`                      |
    /// | `upload_dir`           | `uploads`                       |
    /// | `max_upload_bytes`     | 10 MiB                          |
    /// | `cors_allowed_origins` | local Vite / dev-server origins |
    /// | `bcrypt_cost`          | 10                              |
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            identity_key: IdentityKey::default(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            bcrypt_cost: BCRYPT_COST,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("identity_key", &self.identity_key)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
