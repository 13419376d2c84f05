use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto};
use crate::features::auth::services::TokenService;

type HmacSha256 = Hmac<Sha256>;

const CREDENTIAL_KEY: &[u8] = b"college-directory-admin-credentials";

/// Admin login against the configured credential pair
pub struct AuthService {
    username_tag: Vec<u8>,
    password_tag: Vec<u8>,
    token_service: Arc<TokenService>,
}

fn credential_mac(value: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(CREDENTIAL_KEY)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(value.as_bytes());
    Ok(mac)
}

fn credential_tag(value: &str) -> Result<Vec<u8>> {
    Ok(credential_mac(value)?.finalize().into_bytes().to_vec())
}

/// Compare `presented` with a stored tag in constant time
fn credential_matches(presented: &str, tag: &[u8]) -> Result<bool> {
    Ok(credential_mac(presented)?.verify_slice(tag).is_ok())
}

impl AuthService {
    pub fn new(username: &str, password: &str, token_service: Arc<TokenService>) -> Result<Self> {
        Ok(Self {
            username_tag: credential_tag(username)?,
            password_tag: credential_tag(password)?,
            token_service,
        })
    }

    pub fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        // Both checks always run
        let username_ok = credential_matches(&dto.username, &self.username_tag)?;
        let password_ok = credential_matches(&dto.password, &self.password_tag)?;

        if !(username_ok & password_ok) {
            tracing::warn!("Rejected admin login for '{}'", dto.username);
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        tracing::info!("Admin '{}' logged in", dto.username);
        self.token_service.issue(&dto.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::JwtValidator;
    use std::time::Duration;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes!";

    fn service() -> AuthService {
        let tokens = Arc::new(TokenService::new(SECRET, Duration::from_secs(60)));
        AuthService::new("root", "hunter22", tokens).unwrap()
    }

    #[test]
    fn test_login_success_issues_valid_token() {
        let response = service()
            .login(LoginRequestDto {
                username: "root".to_string(),
                password: "hunter22".to_string(),
            })
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 60);

        let validator = JwtValidator::new(SECRET, Duration::from_secs(0));
        let admin = validator.validate_token(&response.access_token).unwrap();
        assert_eq!(admin.sub, "root");
    }

    #[test]
    fn test_credentials_must_match_exactly() {
        for (username, password) in [
            ("root", "hunter2"),
            ("root", "hunter222"),
            ("root", ""),
            ("Root", "hunter22"),
            ("", "hunter22"),
        ] {
            let result = service().login(LoginRequestDto {
                username: username.to_string(),
                password: password.to_string(),
            });
            assert!(
                matches!(result, Err(AppError::Unauthorized(_))),
                "{}:{} should be rejected",
                username,
                password
            );
        }
    }

    #[test]
    fn test_credential_tags_do_not_hold_plain_text() {
        let service = service();
        assert_ne!(service.password_tag, b"hunter22".to_vec());
        assert_eq!(service.password_tag.len(), 32);
    }

    #[test]
    fn test_login_wrong_password() {
        let result = service().login(LoginRequestDto {
            username: "root".to_string(),
            password: "wrong".to_string(),
        });
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
