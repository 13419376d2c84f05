use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for college
///
/// `course_ids` keeps the submitted order and may contain duplicates.
#[derive(Debug, Clone, FromRow)]
pub struct College {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub fees: Decimal,
    pub rank: Decimal,
    pub location: Option<String>,
    pub city_id: Uuid,
    pub course_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a college
#[derive(Debug, Clone)]
pub struct NewCollege {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub fees: Decimal,
    pub rank: Decimal,
    pub location: Option<String>,
    pub city_id: Uuid,
    pub course_ids: Vec<Uuid>,
}
