use std::sync::Arc;

use axum::{extract::State, Json};

use crate::features::catalog::dtos::SettingsDto;

/// Get the public origins presentation layers should use
///
/// Image references are relative to `storageBaseUrl`.
#[utoipa::path(
    get,
    path = "/api/public/settings",
    responses(
        (status = 200, description = "Public settings", body = SettingsDto),
    ),
    tag = "settings"
)]
pub async fn get_settings(State(settings): State<Arc<SettingsDto>>) -> Json<SettingsDto> {
    Json(settings.as_ref().clone())
}
