use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::Duration;

use super::model::{AccessClaims, AuthenticatedAdmin};
use crate::core::error::AppError;
use crate::shared::constants::{ROLE_ADMIN, TOKEN_ISSUER};

/// Verifies HS256 admin access tokens signed with the shared auth secret
pub struct JwtValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedAdmin, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.leeway = self.leeway;

        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;

        if claims.role != ROLE_ADMIN {
            return Err(AppError::Unauthorized(
                "Admin access token required".to_string(),
            ));
        }

        Ok(AuthenticatedAdmin {
            sub: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::TokenService;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes!";

    fn sign(claims: &AccessClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(role: &str, exp_offset: i64) -> AccessClaims {
        let now = Utc::now().timestamp();
        AccessClaims {
            sub: "admin".to_string(),
            role: role.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now as u64,
            exp: (now + exp_offset) as u64,
        }
    }

    #[test]
    fn test_issued_token_validates() {
        let tokens = TokenService::new(SECRET, Duration::from_secs(3600));
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));

        let issued = tokens.issue("admin").unwrap();
        let admin = validator.validate_token(&issued.access_token).unwrap();
        assert_eq!(admin.sub, "admin");
        assert_eq!(admin.role, ROLE_ADMIN);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let token = sign(&claims(ROLE_ADMIN, 3600), "some-other-secret-of-sufficient-size");
        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let token = sign(&claims(ROLE_ADMIN, -600), SECRET);
        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_admin_role_is_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let token = sign(&claims("visitor", 3600), SECRET);
        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        assert!(validator.validate_token("not.a.jwt").is_err());
    }
}
