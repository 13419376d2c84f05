use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::models::{
    City, College, Course, EntityRef, NewCity, NewCollege, NewCourse,
};

use super::{CatalogStore, CollegeFilter, RankOrder};

#[derive(Default)]
struct Tables {
    cities: Vec<City>,
    courses: Vec<Course>,
    colleges: Vec<College>,
}

/// In-memory entity store with the same uniqueness rules as PostgreSQL
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    fail_next_insert: AtomicBool,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Let reads through but fail the next insert as if the store went away
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    fn tables_for_insert(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::Unavailable(
                "Entity store is unavailable".to_string(),
            ));
        }
        self.tables()
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable(
                "Entity store is unavailable".to_string(),
            ));
        }
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".to_string()))
    }

    fn matches(filter: &CollegeFilter, college: &College) -> bool {
        filter
            .course_id
            .map_or(true, |id| college.course_ids.contains(&id))
            && filter.city_id.map_or(true, |id| college.city_id == id)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_cities(&self) -> Result<Vec<City>> {
        Ok(self.tables()?.cities.clone())
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        Ok(self.tables()?.courses.clone())
    }

    async fn find_city(&self, id: Uuid) -> Result<Option<City>> {
        Ok(self.tables()?.cities.iter().find(|c| c.id == id).cloned())
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>> {
        Ok(self.tables()?.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn find_college(&self, id: Uuid) -> Result<Option<College>> {
        Ok(self.tables()?.colleges.iter().find(|c| c.id == id).cloned())
    }

    async fn find_colleges(&self, filter: &CollegeFilter) -> Result<Vec<College>> {
        let mut colleges: Vec<College> = self
            .tables()?
            .colleges
            .iter()
            .filter(|c| Self::matches(filter, c))
            .cloned()
            .collect();

        // Stable sorts keep insertion order among equal ranks
        match filter.rank {
            Some(RankOrder::Asc) => colleges.sort_by(|a, b| a.rank.cmp(&b.rank)),
            Some(RankOrder::Desc) => colleges.sort_by(|a, b| b.rank.cmp(&a.rank)),
            None => {}
        }

        Ok(colleges)
    }

    async fn count_colleges(&self, filter: &CollegeFilter) -> Result<i64> {
        let count = self
            .tables()?
            .colleges
            .iter()
            .filter(|c| Self::matches(filter, c))
            .count();
        Ok(count as i64)
    }

    async fn city_refs(&self, ids: &[Uuid]) -> Result<Vec<EntityRef>> {
        Ok(self
            .tables()?
            .cities
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| EntityRef {
                id: c.id,
                name: c.name.clone(),
            })
            .collect())
    }

    async fn course_refs(&self, ids: &[Uuid]) -> Result<Vec<EntityRef>> {
        Ok(self
            .tables()?
            .courses
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| EntityRef {
                id: c.id,
                name: c.name.clone(),
            })
            .collect())
    }

    async fn insert_city(&self, city: NewCity) -> Result<City> {
        let mut tables = self.tables_for_insert()?;
        if tables.cities.iter().any(|c| c.name == city.name) {
            return Err(AppError::Conflict(format!(
                "City '{}' already exists",
                city.name
            )));
        }

        let city = City {
            id: Uuid::now_v7(),
            name: city.name,
            description: city.description,
            image_url: city.image_url,
            created_at: Utc::now(),
        };
        tables.cities.push(city.clone());
        Ok(city)
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course> {
        let mut tables = self.tables_for_insert()?;
        if tables.courses.iter().any(|c| c.name == course.name) {
            return Err(AppError::Conflict(format!(
                "Course '{}' already exists",
                course.name
            )));
        }

        let course = Course {
            id: Uuid::now_v7(),
            name: course.name,
            description: course.description,
            avg_fees: course.avg_fees,
            created_at: Utc::now(),
        };
        tables.courses.push(course.clone());
        Ok(course)
    }

    async fn insert_college(&self, college: NewCollege) -> Result<College> {
        let college = College {
            id: Uuid::now_v7(),
            name: college.name,
            description: college.description,
            image_url: college.image_url,
            fees: college.fees,
            rank: college.rank,
            location: college.location,
            city_id: college.city_id,
            course_ids: college.course_ids,
            created_at: Utc::now(),
        };
        self.tables_for_insert()?.colleges.push(college.clone());
        Ok(college)
    }
}
