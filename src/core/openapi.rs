use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::catalog::{dtos as catalog_dtos, handlers as catalog_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::get_me,
        // Catalog (public)
        catalog_handlers::list_colleges,
        catalog_handlers::get_college,
        catalog_handlers::list_colleges_by_course,
        catalog_handlers::list_colleges_by_city,
        catalog_handlers::list_courses,
        catalog_handlers::get_course,
        catalog_handlers::list_cities,
        catalog_handlers::get_city,
        // Settings (public)
        catalog_handlers::get_settings,
        // Admin
        admin_handlers::create_college,
        admin_handlers::create_course,
        admin_handlers::create_city,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Auth
            auth::model::AuthenticatedAdmin,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            // Catalog
            catalog_dtos::EntityRefDto,
            catalog_dtos::CityDto,
            catalog_dtos::CityWithCountDto,
            catalog_dtos::CourseDto,
            catalog_dtos::CourseWithCountDto,
            catalog_dtos::CollegeDto,
            catalog_dtos::CourseDetailDto,
            catalog_dtos::CityDetailDto,
            catalog_dtos::SettingsDto,
            // Admin
            admin_dtos::CreateCourseDto,
            admin_dtos::CreateCollegeMultipart,
            admin_dtos::CreateCityMultipart,
        )
    ),
    tags(
        (name = "catalog", description = "Public college, course and city browsing"),
        (name = "settings", description = "Public origins for building links and image URLs"),
        (name = "auth", description = "Admin authentication"),
        (name = "admin", description = "Catalog submissions (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "College Directory API",
        version = "0.1.0",
        description = "Browse colleges, the courses they offer and the cities they are in",
    )
)]
pub struct ApiDoc;

/// Adds the bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Overrides OpenAPI info and server list from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
    pub api_base_url: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
        openapi.servers = Some(vec![Server::new(self.api_base_url.clone())]);
    }
}
