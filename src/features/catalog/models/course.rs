use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for course
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub avg_fees: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub avg_fees: String,
}
