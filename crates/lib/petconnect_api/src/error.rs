//! Application error types.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use petconnect_core::auth::{AuthError, IdentityKey};
use petconnect_core::files::FileError;
use petconnect_core::models::ValidationError;
use petconnect_core::store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// 401. `error` is the short summary clients switch on.
    #[error("Unauthorized: {error}")]
    Unauthorized {
        error: String,
        message: Option<String>,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn invalid_token(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            error: "Invalid token".into(),
            message: Some(message.into()),
        }
    }

    pub fn token_expired() -> Self {
        AppError::Unauthorized {
            error: "Token expired".into(),
            message: Some("Token has expired; log in again".into()),
        }
    }

    pub fn authentication_required() -> Self {
        AppError::Unauthorized {
            error: "Authentication required".into(),
            message: Some("Missing bearer token".into()),
        }
    }

    /// Same response for unknown principals and wrong passwords.
    pub fn invalid_credentials(key: IdentityKey) -> Self {
        AppError::Unauthorized {
            error: format!("Invalid {key} or password"),
            message: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m, None),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "Not found".to_string(), Some(m)),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m, None),
            AppError::Unauthorized { error, message } => (StatusCode::UNAUTHORIZED, error, message),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "Forbidden".to_string(), Some(m)),
            AppError::PayloadTooLarge(m) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large".to_string(),
                Some(m),
            ),
            AppError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };
        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenError(msg) => AppError::Internal(msg),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Store(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.0)
    }
}

impl From<FileError> for AppError {
    fn from(e: FileError) -> Self {
        match e {
            FileError::Empty => AppError::Validation(e.to_string()),
            FileError::InvalidName(_) => AppError::Validation(e.to_string()),
            FileError::NotFound(name) => AppError::NotFound(format!("File {name}")),
            FileError::Io(e) => AppError::Internal(format!("file io: {e}")),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(e.body_text());
        }
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_keeps_error_and_message() {
        let (status, json) = body_json(AppError::invalid_token("bad segment")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Invalid token");
        assert_eq!(json["message"], "bad segment");
    }

    #[tokio::test]
    async fn credentials_error_names_the_identity_key() {
        let (_, json) = body_json(AppError::invalid_credentials(IdentityKey::Email)).await;
        assert_eq!(json["error"], "Invalid email or password");
        assert!(json.get("message").is_none());
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, json) = body_json(AppError::Internal("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal server error");
        assert!(!json.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn store_conflict_is_409() {
        let err = AppError::from(StoreError::Conflict("Email already exists".into()));
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "Email already exists");
    }
}
