use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Admin identity extracted from a validated bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedAdmin {
    /// Token subject (admin username)
    pub sub: String,
    pub role: String,
}

/// Claims carried by admin access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}
