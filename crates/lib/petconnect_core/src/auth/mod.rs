//! Authentication logic.
//!
//! Token issuance and validation, password hashing and credential checks.
//! Everything here is independent of the HTTP layer so it can be exercised
//! directly from tests and from `petconnect_api`.

pub mod credentials;
pub mod identity;
pub mod password;
pub mod secret;
pub mod token;
pub mod validator;

use thiserror::Error;

use crate::store::StoreError;

pub use credentials::{CredentialVerifier, VerifyResult};
pub use identity::IdentityKey;
pub use token::{DecodeError, TokenClaims, TokenCodec};
pub use validator::{AuthResult, TokenValidator};

/// Authentication errors that are not part of the normal failure taxonomy.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
