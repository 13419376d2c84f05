use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::AuthResponseDto;
use crate::features::auth::model::AccessClaims;
use crate::shared::constants::{ROLE_ADMIN, TOKEN_ISSUER};

/// Mints admin access tokens signed with the shared auth secret
pub struct TokenService {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue an admin access token for `subject`
    pub fn issue(&self, subject: &str) -> Result<AuthResponseDto> {
        let now = Utc::now().timestamp().max(0) as u64;
        let expires_in = self.ttl.as_secs();

        let claims = AccessClaims {
            sub: subject.to_string(),
            role: ROLE_ADMIN.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now,
            exp: now + expires_in,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in as i64,
        })
    }
}
