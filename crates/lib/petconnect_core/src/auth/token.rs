//! JWT encoding and decoding.
//!
//! The codec signs with HS256 over a secret handed to it at construction.
//! `decode` checks structure and signature only; expiry is the validator's job.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AuthError;
use crate::models::auth::Role;

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the principal's identity under the active identity key.
    pub sub: String,
    /// Role at issuance.
    pub role: Role,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Why a token string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not verify")]
    BadSignature,
}

/// Issues and decodes signed tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token valid for `ttl` from now.
    pub fn issue(&self, subject: &str, role: Role, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(subject, role, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        if subject.is_empty() {
            return Err(AuthError::ValidationError("token subject is empty".into()));
        }
        if ttl <= Duration::zero() {
            return Err(AuthError::ValidationError(format!(
                "token ttl must be positive, got {ttl}"
            )));
        }
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::ValidationError(format!("token ttl {ttl} overflows the clock"))
        })?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
    }

    /// Decode and verify the signature. Does not look at `exp`.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, DecodeError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DecodeError::BadSignature,
                _ => DecodeError::Malformed(e.to_string()),
            })
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}
