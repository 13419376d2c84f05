use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::dtos::{
    CityDetailDto, CityDto, CityWithCountDto, CollegeDto, CourseDetailDto, CourseDto,
    CourseWithCountDto, EntityRefDto,
};
use crate::features::catalog::models::{College, EntityRef};
use crate::features::catalog::store::{CatalogStore, CollegeFilter};

/// Public read side of the catalog: filtering, joins and derived counts
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// List colleges matching every constraint in `filter`
    pub async fn list_colleges(&self, filter: &CollegeFilter) -> Result<Vec<CollegeDto>> {
        let colleges = self.store.find_colleges(filter).await?;
        self.resolve_colleges(colleges).await
    }

    /// List all courses with the number of colleges offering each one
    ///
    /// Counts are fetched concurrently, one query per course, and are not
    /// taken from the same snapshot as the course list.
    pub async fn list_courses_with_counts(&self) -> Result<Vec<CourseWithCountDto>> {
        let courses = self.store.list_courses().await?;
        let store = &self.store;

        try_join_all(courses.into_iter().map(|course| async move {
            let filter = CollegeFilter::by_course(course.id);
            let college_count = store.count_colleges(&filter).await?;
            Ok::<_, AppError>(CourseWithCountDto {
                course: course.into(),
                college_count,
            })
        }))
        .await
    }

    /// List all cities with the number of colleges located in each one
    pub async fn list_cities_with_counts(&self) -> Result<Vec<CityWithCountDto>> {
        let cities = self.store.list_cities().await?;
        let store = &self.store;

        try_join_all(cities.into_iter().map(|city| async move {
            let filter = CollegeFilter::by_city(city.id);
            let college_count = store.count_colleges(&filter).await?;
            Ok::<_, AppError>(CityWithCountDto {
                city: city.into(),
                college_count,
            })
        }))
        .await
    }

    /// Get a single college with city and courses resolved
    pub async fn get_college(&self, id: Uuid) -> Result<CollegeDto> {
        let college = self
            .store
            .find_college(id)
            .await?
            .ok_or_else(|| AppError::NotFound("College not found".to_string()))?;

        let mut resolved = self.resolve_colleges(vec![college]).await?;
        resolved
            .pop()
            .ok_or_else(|| AppError::Internal("College vanished while resolving".to_string()))
    }

    /// Get a course and every college that offers it
    pub async fn get_course_detail(&self, id: Uuid) -> Result<CourseDetailDto> {
        let course = self
            .store
            .find_course(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        let colleges = self.colleges_by_course(id).await?;

        Ok(CourseDetailDto {
            course: CourseDto::from(course),
            colleges,
        })
    }

    /// Get a city and every college located in it
    pub async fn get_city_detail(&self, id: Uuid) -> Result<CityDetailDto> {
        let city = self
            .store
            .find_city(id)
            .await?
            .ok_or_else(|| AppError::NotFound("City not found".to_string()))?;

        let colleges = self.colleges_by_city(id).await?;

        Ok(CityDetailDto {
            city: CityDto::from(city),
            colleges,
        })
    }

    pub async fn colleges_by_course(&self, course_id: Uuid) -> Result<Vec<CollegeDto>> {
        self.list_colleges(&CollegeFilter::by_course(course_id)).await
    }

    pub async fn colleges_by_city(&self, city_id: Uuid) -> Result<Vec<CollegeDto>> {
        self.list_colleges(&CollegeFilter::by_city(city_id)).await
    }

    /// Replace city and course ids with `{id, name}` projections.
    ///
    /// Names are fetched with one query per entity type for the whole batch.
    /// Course order follows the stored order; ids that no longer resolve are
    /// dropped.
    async fn resolve_colleges(&self, colleges: Vec<College>) -> Result<Vec<CollegeDto>> {
        if colleges.is_empty() {
            return Ok(Vec::new());
        }

        let city_ids = unique_ids(colleges.iter().map(|c| c.city_id));
        let course_ids = unique_ids(colleges.iter().flat_map(|c| c.course_ids.iter().copied()));

        let (cities, courses) = futures::try_join!(
            self.store.city_refs(&city_ids),
            self.store.course_refs(&course_ids),
        )?;

        let cities = index_by_id(cities);
        let courses = index_by_id(courses);

        Ok(colleges
            .into_iter()
            .map(|college| {
                let city = cities.get(&college.city_id).cloned();
                let resolved = college
                    .course_ids
                    .iter()
                    .filter_map(|id| courses.get(id).cloned())
                    .collect();
                CollegeDto::resolved(college, city, resolved)
            })
            .collect())
    }
}

/// Distinct ids in first-seen order
fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn index_by_id(refs: Vec<EntityRef>) -> HashMap<Uuid, EntityRefDto> {
    refs.into_iter()
        .map(|r| (r.id, EntityRefDto::from(r)))
        .collect()
}
