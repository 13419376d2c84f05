use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::catalog::dtos::{
    parse_filter_id, CityDetailDto, CityWithCountDto, CollegeDto, CollegeListQuery,
    CourseDetailDto, CourseWithCountDto,
};
use crate::features::catalog::services::CatalogService;
use crate::shared::types::ErrorResponse;

/// A path id that is not a UUID can never match a record
fn parse_detail_id(value: &str, entity: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

/// List colleges
///
/// Filters combine as a conjunction. Without `rank`, colleges come in creation order.
#[utoipa::path(
    get,
    path = "/api/public/colleges",
    params(CollegeListQuery),
    responses(
        (status = 200, description = "Matching colleges", body = Vec<CollegeDto>),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
    ),
    tag = "catalog"
)]
pub async fn list_colleges(
    State(service): State<Arc<CatalogService>>,
    AppQuery(query): AppQuery<CollegeListQuery>,
) -> Result<Json<Vec<CollegeDto>>> {
    let filter = query.into_filter()?;
    let colleges = service.list_colleges(&filter).await?;
    Ok(Json(colleges))
}

/// List courses with the number of colleges offering each
#[utoipa::path(
    get,
    path = "/api/public/courses",
    responses(
        (status = 200, description = "All courses", body = Vec<CourseWithCountDto>),
    ),
    tag = "catalog"
)]
pub async fn list_courses(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<Vec<CourseWithCountDto>>> {
    Ok(Json(service.list_courses_with_counts().await?))
}

/// List cities with the number of colleges in each
#[utoipa::path(
    get,
    path = "/api/public/cities",
    responses(
        (status = 200, description = "All cities", body = Vec<CityWithCountDto>),
    ),
    tag = "catalog"
)]
pub async fn list_cities(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<Vec<CityWithCountDto>>> {
    Ok(Json(service.list_cities_with_counts().await?))
}

/// Get college by id
#[utoipa::path(
    get,
    path = "/api/public/colleges/{id}",
    params(
        ("id" = String, Path, description = "College id")
    ),
    responses(
        (status = 200, description = "College found", body = CollegeDto),
        (status = 404, description = "College not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_college(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Result<Json<CollegeDto>> {
    let id = parse_detail_id(&id, "College")?;
    Ok(Json(service.get_college(id).await?))
}

/// Get course by id together with the colleges offering it
#[utoipa::path(
    get,
    path = "/api/public/courses/{id}",
    params(
        ("id" = String, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailDto),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_course(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetailDto>> {
    let id = parse_detail_id(&id, "Course")?;
    Ok(Json(service.get_course_detail(id).await?))
}

/// Get city by id together with the colleges located in it
#[utoipa::path(
    get,
    path = "/api/public/cities/{id}",
    params(
        ("id" = String, Path, description = "City id")
    ),
    responses(
        (status = 200, description = "City found", body = CityDetailDto),
        (status = 404, description = "City not found", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_city(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Result<Json<CityDetailDto>> {
    let id = parse_detail_id(&id, "City")?;
    Ok(Json(service.get_city_detail(id).await?))
}

/// List colleges offering a course
#[utoipa::path(
    get,
    path = "/api/public/colleges/by-course/{course_id}",
    params(
        ("course_id" = String, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Colleges offering the course", body = Vec<CollegeDto>),
        (status = 400, description = "Malformed course id", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_colleges_by_course(
    State(service): State<Arc<CatalogService>>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<CollegeDto>>> {
    let course_id = parse_filter_id("course", &course_id)?;
    Ok(Json(service.colleges_by_course(course_id).await?))
}

/// List colleges located in a city
#[utoipa::path(
    get,
    path = "/api/public/colleges/by-city/{city_id}",
    params(
        ("city_id" = String, Path, description = "City id")
    ),
    responses(
        (status = 200, description = "Colleges in the city", body = Vec<CollegeDto>),
        (status = 400, description = "Malformed city id", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_colleges_by_city(
    State(service): State<Arc<CatalogService>>,
    Path(city_id): Path<String>,
) -> Result<Json<Vec<CollegeDto>>> {
    let city_id = parse_filter_id("city", &city_id)?;
    Ok(Json(service.colleges_by_city(city_id).await?))
}
