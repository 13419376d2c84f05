use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes, nested under `/api/admin` behind the auth middleware
pub fn routes(admin_service: Arc<AdminService>, max_body_size: usize) -> Router {
    Router::new()
        .route("/colleges", post(handlers::create_college))
        .route("/courses", post(handlers::create_course))
        .route("/cities", post(handlers::create_city))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(admin_service)
}
