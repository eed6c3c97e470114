//! # petconnect_api
//!
//! HTTP API library for PetConnect.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use petconnect_core::auth::{TokenCodec, TokenValidator};
use petconnect_core::files::FileStore;
use petconnect_core::store::Store;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{auth, contact, health, pets, uploads};
use crate::middleware::auth::{authenticate, require_admin, require_auth};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Principals, pets and contact messages.
    pub store: Arc<dyn Store>,
    /// API configuration.
    pub config: ApiConfig,
    /// Token validator (and, through it, the codec used to mint tokens).
    pub tokens: TokenValidator,
    /// Uploaded files.
    pub files: FileStore,
}

impl AppState {
    /// Build the state; the token codec is keyed from `config.jwt_secret`.
    pub fn new(config: ApiConfig, store: Arc<dyn Store>, files: FileStore) -> Self {
        let codec = Arc::new(TokenCodec::new(config.jwt_secret.as_bytes()));
        Self {
            store,
            tokens: TokenValidator::new(codec),
            config,
            files,
        }
    }
}

/// CORS for the configured browser origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    // Public routes (anonymous access allowed). Paths that mix public reads
    // with authenticated writes gate only the write methods, so an unknown
    // method there still gets 405.
    let public = Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/ping", get(health::ping_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/validate", get(auth::validate_handler))
        .route(
            "/api/pets",
            get(pets::list_pets_handler)
                .merge(post(pets::create_pet_handler).route_layer(from_fn(require_auth))),
        )
        .route(
            "/api/pets/{id}",
            get(pets::get_pet_handler).merge(
                put(pets::update_pet_handler)
                    .delete(pets::delete_pet_handler)
                    .route_layer(from_fn(require_auth)),
            ),
        )
        .route("/api/pets/owner/{owner_id}", get(pets::list_owner_pets_handler))
        .route(
            "/api/pets/owner/{owner_id}/active",
            get(pets::list_active_owner_pets_handler),
        )
        .route("/api/pets/species/{species}", get(pets::list_species_pets_handler))
        .route("/api/contact", post(contact::submit_contact_handler))
        .route("/uploads/{filename}", get(uploads::serve_upload_handler));

    // Protected routes (any authenticated principal)
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/api/upload",
            post(uploads::upload_handler)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/api/upload/{filename}", delete(uploads::delete_upload_handler))
        .route_layer(from_fn(require_auth));

    // Admin routes
    let admin = Router::new()
        .route("/api/contact/messages", get(contact::list_contact_messages_handler))
        .route_layer(from_fn(require_admin));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .fallback(|| async { AppError::NotFound("No such route".into()) })
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
