use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::auth::services::AuthService;
use crate::shared::types::ErrorResponse;
use crate::shared::validation::format_validation_errors;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// Exchange the configured admin credentials for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<AuthResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;

    Ok(Json(service.login(dto)?))
}

/// Get the admin identity carried by the current token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current admin", body = AuthenticatedAdmin),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(admin: AuthenticatedAdmin) -> Json<AuthenticatedAdmin> {
    Json(admin)
}
