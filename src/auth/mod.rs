pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Issue a signed bearer token for a user identity
pub fn issue_token(user_id: Uuid, security: &SecurityConfig) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let claims = Claims::new(user_id, security.jwt_expiry_hours);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify a bearer token; returns the user identity it was issued for
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Uuid, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 1,
            reset_token_expiry_minutes: 10,
        }
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, &security()).unwrap();
        assert_eq!(verify_token(&token, &security()).unwrap(), user_id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(Uuid::new_v4(), &security()).unwrap();
        let other = SecurityConfig {
            jwt_secret: "other-secret".to_string(),
            ..security()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn empty_secret_is_an_error() {
        let config = SecurityConfig {
            jwt_secret: String::new(),
            ..security()
        };
        assert!(matches!(
            issue_token(Uuid::new_v4(), &config),
            Err(AuthError::MissingSecret)
        ));
    }
}
