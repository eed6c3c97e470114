//! Password credential checks against the principal store.

use tracing::{debug, warn};

use super::AuthError;
use super::identity::IdentityKey;
use super::password::verify_password;
use crate::models::auth::Principal;
use crate::store::PrincipalStore;

/// Outcome of a credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Verified(Principal),
    NotFound,
    Mismatch,
}

/// Checks a submitted password for the principal named by `lookup_key`.
pub struct CredentialVerifier<'a> {
    store: &'a dyn PrincipalStore,
    key: IdentityKey,
}

impl<'a> CredentialVerifier<'a> {
    pub fn new(store: &'a dyn PrincipalStore, key: IdentityKey) -> Self {
        Self { store, key }
    }

    /// Look up by the configured identity key and compare the bcrypt hash.
    ///
    /// Only store failures surface as `Err`; unknown principals and wrong
    /// passwords are ordinary outcomes.
    pub async fn verify(&self, lookup_key: &str, password: &str) -> Result<VerifyResult, AuthError> {
        let Some(principal) = self.store.find_principal(self.key, lookup_key.trim()).await? else {
            debug!(key = %self.key, "credential check: no such principal");
            return Ok(VerifyResult::NotFound);
        };

        match verify_password(password, &principal.password_hash) {
            Ok(true) => Ok(VerifyResult::Verified(principal)),
            Ok(false) => {
                debug!(principal_id = %principal.id, "credential check: password mismatch");
                Ok(VerifyResult::Mismatch)
            }
            Err(e) => {
                warn!(principal_id = %principal.id, error = %e, "stored password hash is unreadable");
                Ok(VerifyResult::Mismatch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::models::auth::{NewPrincipal, Role};
    use crate::store::MemoryStore;

    async fn store_with_alice() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_principal(NewPrincipal {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password_hash: hash_password("s3cret-pass", 4).unwrap(),
                role: Role::User,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn exact_password_verifies() {
        let store = store_with_alice().await;
        let verifier = CredentialVerifier::new(&store, IdentityKey::Username);
        match verifier.verify("alice", "s3cret-pass").await.unwrap() {
            VerifyResult::Verified(p) => {
                assert_eq!(p.username, "alice");
                assert_eq!(p.role, Role::User);
            }
            other => panic!("expected Verified, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn any_other_password_is_mismatch() {
        let store = store_with_alice().await;
        let verifier = CredentialVerifier::new(&store, IdentityKey::Username);
        for wrong in ["", "s3cret-pas", "s3cret-pass ", "S3CRET-PASS"] {
            assert_eq!(
                verifier.verify("alice", wrong).await.unwrap(),
                VerifyResult::Mismatch
            );
        }
    }

    #[tokio::test]
    async fn lookup_follows_identity_profile() {
        let store = store_with_alice().await;

        let by_username = CredentialVerifier::new(&store, IdentityKey::Username);
        assert_eq!(
            by_username.verify("alice@example.com", "s3cret-pass").await.unwrap(),
            VerifyResult::NotFound
        );

        let by_email = CredentialVerifier::new(&store, IdentityKey::Email);
        assert!(matches!(
            by_email.verify("alice@example.com", "s3cret-pass").await.unwrap(),
            VerifyResult::Verified(_)
        ));
        assert_eq!(
            by_email.verify("alice", "s3cret-pass").await.unwrap(),
            VerifyResult::NotFound
        );
    }

    #[tokio::test]
    async fn corrupt_hash_is_mismatch() {
        let store = MemoryStore::new();
        store
            .create_principal(NewPrincipal {
                username: "mallory".into(),
                email: "mallory@example.com".into(),
                password_hash: "plaintext-password".into(),
                role: Role::User,
            })
            .await
            .unwrap();
        let verifier = CredentialVerifier::new(&store, IdentityKey::Username);
        assert_eq!(
            verifier.verify("mallory", "plaintext-password").await.unwrap(),
            VerifyResult::Mismatch
        );
    }
}
