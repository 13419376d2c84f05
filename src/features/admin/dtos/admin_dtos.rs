use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::shared::validation::{format_validation_errors, not_blank};

/// Raw image part of a multipart submission
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// File extension for an accepted image content type
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// JSON body for creating a course
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseDto {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "name is required"))]
    #[schema(example = "Computer Science")]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "description is required"))]
    pub description: String,

    /// Free-text average fees, e.g. "10000"
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "avgFees is required"))]
    #[schema(example = "10000")]
    pub avg_fees: String,
}

/// City submission collected from a multipart form
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateCityForm {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "description is required"))]
    pub description: String,

    pub image: Option<ImageUpload>,
}

/// College submission collected from a multipart form, still as raw text
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateCollegeForm {
    #[validate(custom(function = "not_blank", message = "name is required"))]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "description is required"))]
    pub description: String,

    #[validate(custom(function = "not_blank", message = "fees is required"))]
    pub fees: String,

    #[validate(custom(function = "not_blank", message = "rank is required"))]
    pub rank: String,

    pub location: Option<String>,

    #[validate(custom(function = "not_blank", message = "cityId is required"))]
    pub city_id: String,

    /// JSON-encoded array of course ids
    pub course_ids: Option<String>,

    pub image: Option<ImageUpload>,
}

/// College submission with every scalar field parsed
#[derive(Debug, Clone)]
pub struct ParsedCollege {
    pub name: String,
    pub description: String,
    pub fees: Decimal,
    pub rank: Decimal,
    pub location: Option<String>,
    pub city_id: Uuid,
    pub course_ids: Vec<Uuid>,
}

impl CreateCollegeForm {
    /// Check required fields and parse numbers and ids.
    ///
    /// All problems are reported together as one validation error.
    pub fn parse(&self) -> Result<ParsedCollege> {
        let mut messages: Vec<String> = Vec::new();

        if let Err(e) = self.validate() {
            messages.push(format_validation_errors(&e));
        }

        let fees = parse_present(&self.fees, parse_number)
            .ok_or_else(|| "fees must be a number".to_string());
        let rank = parse_present(&self.rank, parse_number)
            .ok_or_else(|| "rank must be a number".to_string());
        let city_id = parse_present(&self.city_id, |v| Uuid::parse_str(v).ok())
            .ok_or_else(|| "cityId must be a valid id".to_string());
        let course_ids = match self.course_ids.as_deref() {
            Some(raw) => serde_json::from_str::<Vec<Uuid>>(raw.trim())
                .map_err(|_| "courseIds must be a JSON array of ids".to_string()),
            None => Err("courseIds is required".to_string()),
        };

        // Blank fields were already reported as missing
        for (raw, result) in [
            (&self.fees, fees.as_ref().err()),
            (&self.rank, rank.as_ref().err()),
            (&self.city_id, city_id.as_ref().err()),
        ] {
            if let Some(message) = result {
                if !raw.trim().is_empty() {
                    messages.push(message.clone());
                }
            }
        }
        if let Err(message) = &course_ids {
            messages.push(message.clone());
        }

        match (fees, rank, city_id, course_ids) {
            (Ok(fees), Ok(rank), Ok(city_id), Ok(course_ids)) if messages.is_empty() => {
                Ok(ParsedCollege {
                    name: self.name.trim().to_string(),
                    description: self.description.trim().to_string(),
                    fees,
                    rank,
                    location: self
                        .location
                        .as_deref()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                    city_id,
                    course_ids,
                })
            }
            _ => Err(AppError::Validation(messages.join("; "))),
        }
    }
}

/// Plain decimals and scientific notation such as `2e3`
fn parse_number(value: &str) -> Option<Decimal> {
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn parse_present<T>(raw: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        parse(value)
    }
}

/// Multipart body for `POST /api/admin/colleges`.
/// Documentation only; the handler reads the form with axum's `Multipart`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CreateCollegeMultipart {
    #[schema(example = "Tech U")]
    pub name: String,
    pub description: String,
    #[schema(example = "20000")]
    pub fees: String,
    #[schema(example = "1")]
    pub rank: String,
    pub location: Option<String>,
    pub city_id: String,
    /// JSON array of course ids, e.g. `["0190..."]`
    #[schema(example = "[]")]
    pub course_ids: String,
    /// Optional jpeg, png, gif or webp image
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub college_image: Option<String>,
}

/// Multipart body for `POST /api/admin/cities`.
/// Documentation only; the handler reads the form with axum's `Multipart`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CreateCityMultipart {
    #[schema(example = "Metropolis")]
    pub name: String,
    pub description: String,
    /// Optional jpeg, png, gif or webp image
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub city_image: Option<String>,
}
