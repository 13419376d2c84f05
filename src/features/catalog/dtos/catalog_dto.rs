use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::models::{City, College, Course, EntityRef};
use crate::features::catalog::store::{CollegeFilter, RankOrder};

/// Resolved reference to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRefDto {
    pub id: Uuid,
    pub name: String,
}

impl From<EntityRef> for EntityRefDto {
    fn from(r: EntityRef) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

/// Response DTO for city
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Store-relative image path; empty when the city has no image
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<City> for CityDto {
    fn from(c: City) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            image_url: c.image_url,
            created_at: c.created_at,
        }
    }
}

/// City plus the number of colleges located in it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityWithCountDto {
    #[serde(flatten)]
    pub city: CityDto,
    pub college_count: i64,
}

/// Response DTO for course
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub avg_fees: String,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseDto {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            avg_fees: c.avg_fees,
            created_at: c.created_at,
        }
    }
}

/// Course plus the number of colleges offering it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithCountDto {
    #[serde(flatten)]
    pub course: CourseDto,
    pub college_count: i64,
}

/// College with its city and courses resolved to `{id, name}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Store-relative image path; empty when the college has no image
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub fees: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub rank: Decimal,
    pub location: Option<String>,
    /// `null` only if the referenced city no longer resolves
    pub city: Option<EntityRefDto>,
    pub courses: Vec<EntityRefDto>,
    pub created_at: DateTime<Utc>,
}

impl CollegeDto {
    /// Attach already resolved city and course references to a stored college
    pub fn resolved(
        college: College,
        city: Option<EntityRefDto>,
        courses: Vec<EntityRefDto>,
    ) -> Self {
        Self {
            id: college.id,
            name: college.name,
            description: college.description,
            image_url: college.image_url,
            fees: college.fees,
            rank: college.rank,
            location: college.location,
            city,
            courses,
            created_at: college.created_at,
        }
    }
}

/// Course with every college that offers it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseDetailDto {
    pub course: CourseDto,
    pub colleges: Vec<CollegeDto>,
}

/// City with every college located in it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CityDetailDto {
    pub city: CityDto,
    pub colleges: Vec<CollegeDto>,
}

/// Origins presentation layers need to build links and image URLs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    pub api_base_url: String,
    pub storage_base_url: String,
}

/// Query params for listing colleges
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CollegeListQuery {
    /// Only colleges offering this course id
    pub course: Option<String>,
    /// Only colleges located in this city id
    pub city: Option<String>,
    /// Sort by rank: `asc` or `desc`
    pub rank: Option<String>,
}

impl CollegeListQuery {
    /// Turn raw query values into a store filter; empty values mean "absent"
    pub fn into_filter(self) -> Result<CollegeFilter> {
        let rank = match non_empty(self.rank) {
            Some(value) => Some(RankOrder::parse(&value).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid rank '{}': expected 'asc' or 'desc'",
                    value
                ))
            })?),
            None => None,
        };

        Ok(CollegeFilter {
            course_id: non_empty(self.course)
                .map(|v| parse_filter_id("course", &v))
                .transpose()?,
            city_id: non_empty(self.city)
                .map(|v| parse_filter_id("city", &v))
                .transpose()?,
            rank,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an id used as a filter; a malformed id is a malformed query
pub fn parse_filter_id(param: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid {} id '{}'", param, value)))
}
