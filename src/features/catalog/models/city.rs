use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for city
#[derive(Debug, Clone, FromRow)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Store-relative image key, empty when no image was uploaded
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a city
#[derive(Debug, Clone)]
pub struct NewCity {
    pub name: String,
    pub description: String,
    pub image_url: String,
}
