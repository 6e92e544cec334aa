//! Identity extraction middleware
//!
//! Credential logic and token issuance live in the external identity
//! service. This module only validates the opaque bearer token it issued
//! (HS256, `sub` = user id) and injects the verified caller identity into
//! handlers. Requests without a valid identity are rejected with
//! `Unauthorized` before any controller logic runs.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::errors::{GatherlyError, Result};

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The verified user identity.
    pub sub: i64,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// Validates bearer tokens against the shared identity-service secret
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
}

impl TokenValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Verified caller identity, extracted from the Authorization header
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    TokenValidator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GatherlyError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                GatherlyError::Unauthorized("Missing authorization header".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            GatherlyError::Unauthorized(
                "Invalid authorization format. Expected 'Bearer <token>'".to_string(),
            )
        })?;

        if token.is_empty() {
            return Err(GatherlyError::Unauthorized("Empty bearer token".to_string()));
        }

        let validator = TokenValidator::from_ref(state);
        let claims = validator.decode(token)?;

        if claims.sub <= 0 {
            return Err(GatherlyError::Unauthorized(
                "Token carries no valid user identity".to_string(),
            ));
        }

        debug!(user_id = claims.sub, "Authenticated request");
        Ok(AuthUser { user_id: claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(user_id: i64) -> String {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let validator = TokenValidator::new(SECRET);
        let claims = validator.decode(&token_for(42)).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let validator = TokenValidator::new("other-secret");
        assert!(validator.decode(&token_for(42)).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims {
            sub: 42,
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let validator = TokenValidator::new(SECRET);
        assert!(validator.decode(&token).is_err());
    }
}
