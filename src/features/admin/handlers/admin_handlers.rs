use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppMultipart};
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::AuthenticatedAdmin;
use crate::features::catalog::dtos::{CityDto, CollegeDto, CourseDto};
use crate::shared::types::ErrorResponse;

/// Oversized parts keep their 413; every other read failure is a bad request
fn multipart_error(error: MultipartError, what: &str) -> AppError {
    debug!("Failed to read {}: {}", what, error);
    let message = format!("Failed to read {}: {}", what, error.body_text());
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| multipart_error(e, &format!("{} field", name)))
}

async fn read_image(field: Field<'_>) -> Result<ImageUpload> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let data = field
        .bytes()
        .await
        .map_err(|e| multipart_error(e, "image data"))?;

    Ok(ImageUpload {
        data: data.to_vec(),
        content_type,
    })
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "multipart data"))
}

/// Create a college
///
/// Accepts multipart/form-data with the scalar fields, `courseIds` as a JSON
/// array string and an optional `collegeImage` file.
#[utoipa::path(
    post,
    path = "/api/admin/colleges",
    request_body(
        content = CreateCollegeMultipart,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "College created", body = CollegeDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 503, description = "Entity store or image storage unavailable", body = ErrorResponse)
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_college(
    admin: AuthenticatedAdmin,
    State(service): State<Arc<AdminService>>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<CollegeDto>)> {
    let mut form = CreateCollegeForm::default();

    while let Some(field) = next_field(&mut multipart).await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => form.name = read_text(field, "name").await?,
            "description" => form.description = read_text(field, "description").await?,
            "fees" => form.fees = read_text(field, "fees").await?,
            "rank" => form.rank = read_text(field, "rank").await?,
            "location" => form.location = Some(read_text(field, "location").await?),
            "cityId" => form.city_id = read_text(field, "cityId").await?,
            "courseIds" => form.course_ids = Some(read_text(field, "courseIds").await?),
            "collegeImage" => form.image = Some(read_image(field).await?),
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    debug!("Admin '{}' submitting college '{}'", admin.sub, form.name);
    let college = service.create_college(form).await?;
    Ok((StatusCode::CREATED, Json(college)))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/admin/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Course name already exists", body = ErrorResponse)
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_course(
    _admin: AuthenticatedAdmin,
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<CourseDto>)> {
    let course = service.create_course(dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Create a city
///
/// Accepts multipart/form-data with `name`, `description` and an optional
/// `cityImage` file.
#[utoipa::path(
    post,
    path = "/api/admin/cities",
    request_body(
        content = CreateCityMultipart,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "City created", body = CityDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "City name already exists", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse)
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_city(
    _admin: AuthenticatedAdmin,
    State(service): State<Arc<AdminService>>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<CityDto>)> {
    let mut form = CreateCityForm::default();

    while let Some(field) = next_field(&mut multipart).await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => form.name = read_text(field, "name").await?,
            "description" => form.description = read_text(field, "description").await?,
            "cityImage" => form.image = Some(read_image(field).await?),
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let city = service.create_city(form).await?;
    Ok((StatusCode::CREATED, Json(city)))
}
