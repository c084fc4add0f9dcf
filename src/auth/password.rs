use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::AuthError;

/// One-way credential hash for storage
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a plain credential against a stored hash
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// A freshly minted password-reset token. The plain form goes out by email;
/// only the digest is stored.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub plain: String,
    pub hashed: String,
    pub expires_at: DateTime<Utc>,
}

pub fn new_reset_token(ttl_minutes: i64) -> ResetToken {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    let plain: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

    ResetToken {
        hashed: hash_reset_token(&plain),
        plain,
        expires_at: Utc::now() + Duration::minutes(ttl_minutes),
    }
}

/// SHA-256 hex digest of a plain reset token, matching the stored form
pub fn hash_reset_token(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("123456").unwrap();
        assert!(verify_password("123456", &hash));
        assert!(!verify_password("654321", &hash));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("123456", "not-a-phc-string"));
    }

    #[test]
    fn reset_token_digest_matches_stored_form() {
        let token = new_reset_token(10);
        assert_eq!(hash_reset_token(&token.plain), token.hashed);
        assert_eq!(token.plain.len(), 40);
        assert!(token.expires_at > Utc::now());
    }

    #[test]
    fn reset_tokens_are_unique() {
        assert_ne!(new_reset_token(10).plain, new_reset_token(10).plain);
    }
}
