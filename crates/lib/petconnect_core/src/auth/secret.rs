//! Signing secret resolution.

use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

/// Resolve the signing secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
///
/// When neither variable is set, a 64-character secret is generated once and
/// persisted so that tokens survive a restart.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    load_or_generate(&jwt_secret_path())
}

/// Read the secret at `path`, generating and writing one if it is missing or blank.
pub fn load_or_generate(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!(path = %parent.display(), error = %e, "could not create secret directory");
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new JWT secret"),
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "could not persist JWT secret; tokens will not survive a restart"
        ),
    }
    secret
}

/// Path to the persisted signing secret.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("petconnect")
        .join("jwt-secret")
}
