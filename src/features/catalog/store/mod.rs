//! Entity store port for the catalog
//!
//! Services talk to persistence only through [`CatalogStore`]. The PostgreSQL
//! adapter is used in production; tests swap in the in-memory adapter.

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::catalog::models::{
    City, College, Course, EntityRef, NewCity, NewCollege, NewCourse,
};

/// Sort direction applied to college rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    Asc,
    Desc,
}

impl RankOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(RankOrder::Asc),
            "desc" => Some(RankOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            RankOrder::Asc => "ASC",
            RankOrder::Desc => "DESC",
        }
    }
}

/// Conjunctive college predicate; `None` means "no constraint"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollegeFilter {
    pub course_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub rank: Option<RankOrder>,
}

impl CollegeFilter {
    pub fn by_course(course_id: Uuid) -> Self {
        Self {
            course_id: Some(course_id),
            ..Self::default()
        }
    }

    pub fn by_city(city_id: Uuid) -> Self {
        Self {
            city_id: Some(city_id),
            ..Self::default()
        }
    }
}

/// Durable storage for cities, courses and colleges
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All cities in insertion order
    async fn list_cities(&self) -> Result<Vec<City>>;

    /// All courses in insertion order
    async fn list_courses(&self) -> Result<Vec<Course>>;

    async fn find_city(&self, id: Uuid) -> Result<Option<City>>;

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>>;

    async fn find_college(&self, id: Uuid) -> Result<Option<College>>;

    /// Colleges matching `filter`, sorted by rank when the filter asks for it
    async fn find_colleges(&self, filter: &CollegeFilter) -> Result<Vec<College>>;

    /// Number of colleges matching `filter` (sort is ignored)
    async fn count_colleges(&self, filter: &CollegeFilter) -> Result<i64>;

    /// `{id, name}` for every city in `ids` that exists
    async fn city_refs(&self, ids: &[Uuid]) -> Result<Vec<EntityRef>>;

    /// `{id, name}` for every course in `ids` that exists
    async fn course_refs(&self, ids: &[Uuid]) -> Result<Vec<EntityRef>>;

    /// Fails with `Conflict` when the name is taken
    async fn insert_city(&self, city: NewCity) -> Result<City>;

    /// Fails with `Conflict` when the name is taken
    async fn insert_course(&self, course: NewCourse) -> Result<Course>;

    async fn insert_college(&self, college: NewCollege) -> Result<College>;
}
