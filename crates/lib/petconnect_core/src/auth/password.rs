//! Password hashing via bcrypt.

use super::AuthError;

/// Default bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// Errors only when `hash` is not a bcrypt hash; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let a = hash_password("correct horse", 4).unwrap();
        let b = hash_password("correct horse", 4).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("correct horse", &a).unwrap());
        assert!(verify_password("correct horse", &b).unwrap());
        assert!(!verify_password("correct horse!", &a).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-bcrypt-hash").is_err());
    }
}
