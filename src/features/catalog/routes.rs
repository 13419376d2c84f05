use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::catalog::dtos::SettingsDto;
use crate::features::catalog::handlers;
use crate::features::catalog::services::CatalogService;

/// Create routes for the public catalog
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<CatalogService>, settings: Arc<SettingsDto>) -> Router {
    let catalog = Router::new()
        .route("/api/public/colleges", get(handlers::list_colleges))
        .route("/api/public/colleges/{id}", get(handlers::get_college))
        .route(
            "/api/public/colleges/by-course/{course_id}",
            get(handlers::list_colleges_by_course),
        )
        .route(
            "/api/public/colleges/by-city/{city_id}",
            get(handlers::list_colleges_by_city),
        )
        .route("/api/public/courses", get(handlers::list_courses))
        .route("/api/public/courses/{id}", get(handlers::get_course))
        .route("/api/public/cities", get(handlers::list_cities))
        .route("/api/public/cities/{id}", get(handlers::get_city))
        .with_state(service);

    let settings = Router::new()
        .route("/api/public/settings", get(handlers::get_settings))
        .with_state(settings);

    catalog.merge(settings)
}
