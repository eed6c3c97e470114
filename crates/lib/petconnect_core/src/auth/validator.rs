//! Token validation: signature plus expiry.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::token::{DecodeError, TokenCodec};
use crate::models::auth::Role;

/// Outcome of validating a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Valid { subject: String, role: Role },
    Expired,
    Invalid(DecodeError),
}

impl AuthResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, AuthResult::Valid { .. })
    }
}

/// Checks tokens issued by a [`TokenCodec`]. Stateless: there is no
/// revocation list, so a token stays valid until `exp`.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: Arc<TokenCodec>,
}

impl TokenValidator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn validate(&self, token: &str) -> AuthResult {
        self.validate_at(token, Utc::now())
    }

    /// Validate against an explicit clock. A token is expired once `now >= exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult {
        let claims = match self.codec.decode(token) {
            Ok(claims) => claims,
            Err(reason) => return AuthResult::Invalid(reason),
        };
        if now.timestamp() >= claims.exp {
            return AuthResult::Expired;
        }
        AuthResult::Valid {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn validator() -> TokenValidator {
        TokenValidator::new(Arc::new(TokenCodec::new(b"validator-test-secret")))
    }

    #[test]
    fn fresh_token_is_valid() {
        let v = validator();
        let token = v.codec().issue("alice", Role::User, Duration::hours(1)).unwrap();
        assert_eq!(
            v.validate(&token),
            AuthResult::Valid {
                subject: "alice".into(),
                role: Role::User
            }
        );
    }

    #[test]
    fn token_expires_exactly_at_ttl() {
        let v = validator();
        let issued = Utc::now();
        let ttl = Duration::seconds(90);
        let token = v.codec().issue_at("bob", Role::Admin, ttl, issued).unwrap();

        assert!(v.validate_at(&token, issued + ttl - Duration::seconds(1)).is_valid());
        assert_eq!(v.validate_at(&token, issued + ttl), AuthResult::Expired);
        assert_eq!(
            v.validate_at(&token, issued + ttl + Duration::milliseconds(1500)),
            AuthResult::Expired
        );
    }

    #[test]
    fn tampered_bytes_never_validate() {
        let v = validator();
        let token = v.codec().issue("alice", Role::User, Duration::hours(1)).unwrap();
        assert_eq!(token.split('.').count(), 3);

        for (index, original) in token.bytes().enumerate() {
            if original == b'.' {
                continue;
            }
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if original == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                matches!(v.validate(&tampered), AuthResult::Invalid(_)),
                "tampering at {index} must be invalid"
            );
        }
    }

    #[test]
    fn escalated_role_claim_is_rejected() {
        // ADMIN payload spliced onto a USER signature.
        let v = validator();
        let user_token = v.codec().issue("alice", Role::User, Duration::hours(1)).unwrap();
        let admin_token = v.codec().issue("alice", Role::Admin, Duration::hours(1)).unwrap();
        let user: Vec<&str> = user_token.split('.').collect();
        let admin: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", user[0], admin[1], user[2]);
        assert_eq!(
            v.validate(&forged),
            AuthResult::Invalid(DecodeError::BadSignature)
        );
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            validator().validate("garbage"),
            AuthResult::Invalid(DecodeError::Malformed(_))
        ));
    }
}
