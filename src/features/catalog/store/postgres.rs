use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::models::{
    City, College, Course, EntityRef, NewCity, NewCollege, NewCourse,
};

use super::{CatalogStore, CollegeFilter};

/// Map a failed read query
fn read_error(e: sqlx::Error) -> AppError {
    AppError::from_store(e, "Duplicate record")
}

const COLLEGE_COLUMNS: &str =
    "id, name, description, image_url, fees, rank, location, city_id, course_ids, created_at";

/// `$1` course id, `$2` city id; NULL leaves that dimension unconstrained.
/// Containment (`@>`) keeps the course filter on the GIN index.
const COLLEGE_FILTER: &str = "WHERE ($1::uuid IS NULL OR course_ids @> ARRAY[$1::uuid]) \
     AND ($2::uuid IS NULL OR city_id = $2)";

/// PostgreSQL-backed entity store
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn order_clause(filter: &CollegeFilter) -> String {
        match filter.rank {
            Some(order) => format!("ORDER BY rank {}, created_at, id", order.as_sql()),
            None => "ORDER BY created_at, id".to_string(),
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_cities(&self) -> Result<Vec<City>> {
        sqlx::query_as::<_, City>(
            r#"
            SELECT id, name, description, image_url, created_at
            FROM cities
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list cities: {:?}", e);
            read_error(e)
        })
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, avg_fees, created_at
            FROM courses
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list courses: {:?}", e);
            read_error(e)
        })
    }

    async fn find_city(&self, id: Uuid) -> Result<Option<City>> {
        sqlx::query_as::<_, City>(
            r#"
            SELECT id, name, description, image_url, created_at
            FROM cities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get city {}: {:?}", id, e);
            read_error(e)
        })
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, avg_fees, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get course {}: {:?}", id, e);
            read_error(e)
        })
    }

    async fn find_college(&self, id: Uuid) -> Result<Option<College>> {
        let sql = format!("SELECT {} FROM colleges WHERE id = $1", COLLEGE_COLUMNS);

        sqlx::query_as::<_, College>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get college {}: {:?}", id, e);
                read_error(e)
            })
    }

    async fn find_colleges(&self, filter: &CollegeFilter) -> Result<Vec<College>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM colleges
            {}
            {}
            "#,
            COLLEGE_COLUMNS,
            COLLEGE_FILTER,
            Self::order_clause(filter)
        );

        sqlx::query_as::<_, College>(&sql)
            .bind(filter.course_id)
            .bind(filter.city_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list colleges with {:?}: {:?}", filter, e);
                read_error(e)
            })
    }

    async fn count_colleges(&self, filter: &CollegeFilter) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM colleges {}", COLLEGE_FILTER);

        sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.course_id)
        .bind(filter.city_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count colleges with {:?}: {:?}", filter, e);
            read_error(e)
        })
    }

    async fn city_refs(&self, ids: &[Uuid]) -> Result<Vec<EntityRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, EntityRef>("SELECT id, name FROM cities WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve city names: {:?}", e);
                read_error(e)
            })
    }

    async fn course_refs(&self, ids: &[Uuid]) -> Result<Vec<EntityRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, EntityRef>("SELECT id, name FROM courses WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve course names: {:?}", e);
                read_error(e)
            })
    }

    async fn insert_city(&self, city: NewCity) -> Result<City> {
        let name = city.name.clone();

        sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (id, name, description, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, image_url, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(city.name)
        .bind(city.description)
        .bind(city.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert city '{}': {:?}", name, e);
            AppError::from_store(e, format!("City '{}' already exists", name))
        })
    }

    async fn insert_course(&self, course: NewCourse) -> Result<Course> {
        let name = course.name.clone();

        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (id, name, description, avg_fees)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, avg_fees, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(course.name)
        .bind(course.description)
        .bind(course.avg_fees)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert course '{}': {:?}", name, e);
            AppError::from_store(e, format!("Course '{}' already exists", name))
        })
    }

    async fn insert_college(&self, college: NewCollege) -> Result<College> {
        let name = college.name.clone();
        let sql = format!(
            r#"
            INSERT INTO colleges
                (id, name, description, image_url, fees, rank, location, city_id, course_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COLLEGE_COLUMNS
        );

        sqlx::query_as::<_, College>(&sql)
            .bind(Uuid::now_v7())
            .bind(college.name)
            .bind(college.description)
            .bind(college.image_url)
            .bind(college.fees)
            .bind(college.rank)
            .bind(college.location)
            .bind(college.city_id)
            .bind(college.course_ids)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert college '{}': {:?}", name, e);
                AppError::from_store(e, format!("College '{}' already exists", name))
            })
    }
}
