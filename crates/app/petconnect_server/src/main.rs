//! PetConnect API server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use petconnect_api::config::{
    ApiConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS,
};
use petconnect_core::auth::IdentityKey;
use petconnect_core::auth::password::BCRYPT_COST;
use petconnect_core::files::FileStore;
use petconnect_core::store::{MemoryStore, PgStore, Store};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::{error, info, warn};

/// CLI arguments; every option can also come from the environment or `.env`.
#[derive(Parser, Debug)]
#[command(name = "petconnect_server", about = "PetConnect API server")]
struct Args {
    /// Full listen address; overrides `--port`.
    #[arg(long, env = "BIND_ADDR")]
    bind_addr: Option<String>,

    /// Port to listen on when no bind address is given (0 = ephemeral).
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// PostgreSQL connection URL. Without one, data lives in memory only.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Lifetime of issued tokens, in seconds (at most ten years).
    #[arg(long, env = "JWT_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS,
          value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_SECS))]
    jwt_ttl_secs: i64,

    /// Principal field used for login and as the token subject.
    #[arg(long, env = "AUTH_IDENTITY_KEY", default_value_t = IdentityKey::Username)]
    identity_key: IdentityKey,

    /// Directory for uploaded files.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Largest accepted upload request, in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Comma-separated browser origins allowed by CORS.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    cors_allowed_origins: Vec<String>,

    /// bcrypt cost for new password hashes.
    #[arg(long, env = "BCRYPT_COST", default_value_t = BCRYPT_COST,
          value_parser = clap::value_parser!(u32).range(4..=31))]
    bcrypt_cost: u32,
}

impl Args {
    fn into_config(self, jwt_secret: String) -> ApiConfig {
        let mut config = ApiConfig::new(jwt_secret);
        config.bind_addr = self
            .bind_addr
            .unwrap_or_else(|| format!("127.0.0.1:{}", self.port));
        config.database_url = self.database_url;
        config.token_ttl = chrono::Duration::seconds(self.jwt_ttl_secs);
        config.identity_key = self.identity_key;
        config.upload_dir = self.upload_dir;
        config.max_upload_bytes = self.max_upload_bytes;
        let origins: Vec<String> = self
            .cors_allowed_origins
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !origins.is_empty() {
            config.cors_allowed_origins = origins;
        }
        config.bcrypt_cost = self.bcrypt_cost;
        config
    }
}

/// Connect and migrate when a database is configured; otherwise fall back to memory.
async fn open_store(
    config: &ApiConfig,
    max_connections: u32,
) -> Result<Arc<dyn Store>, Box<dyn std::error::Error>> {
    let Some(url) = &config.database_url else {
        warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
        return Ok(Arc::new(MemoryStore::new()));
    };

    info!(max_connections, "configuring connection pool");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(url)
        .await?;

    info!("running database migrations");
    petconnect_core::migrate::migrate(&pool).await?;

    Ok(Arc::new(PgStore::new(pool)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,petconnect_api=debug,petconnect_core=debug,tower_http=info",
                )
            }),
        )
        .init();

    let args = Args::parse();
    let max_connections = args.max_connections;
    let config = args.into_config(petconnect_core::auth::secret::resolve_jwt_secret());
    info!(?config, "starting petconnect_server");

    let store = open_store(&config, max_connections).await?;
    let files = FileStore::open(&config.upload_dir).await?;

    let bind_addr = config.bind_addr.clone();
    let app = petconnect_api::router(petconnect_api::AppState::new(config, store, files));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}
