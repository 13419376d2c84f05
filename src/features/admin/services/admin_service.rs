use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    image_extension, CreateCityForm, CreateCollegeForm, CreateCourseDto, ImageUpload,
};
use crate::features::catalog::dtos::{CityDto, CollegeDto, CourseDto, EntityRefDto};
use crate::features::catalog::models::{NewCity, NewCollege, NewCourse};
use crate::features::catalog::store::CatalogStore;
use crate::modules::storage::ImageStorage;
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE};
use crate::shared::validation::format_validation_errors;

const COLLEGE_IMAGE_FOLDER: &str = "colleges";
const CITY_IMAGE_FOLDER: &str = "cities";

/// Image that passed type and size checks
struct AcceptedImage {
    upload: ImageUpload,
    extension: &'static str,
}

/// Write side of the catalog: validates submissions, stores images and
/// persists new records
pub struct AdminService {
    store: Arc<dyn CatalogStore>,
    storage: Arc<dyn ImageStorage>,
}

impl AdminService {
    pub fn new(store: Arc<dyn CatalogStore>, storage: Arc<dyn ImageStorage>) -> Self {
        Self { store, storage }
    }

    pub async fn create_course(&self, dto: CreateCourseDto) -> Result<CourseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;

        let course = self
            .store
            .insert_course(NewCourse {
                name: dto.name.trim().to_string(),
                description: dto.description.trim().to_string(),
                avg_fees: dto.avg_fees.trim().to_string(),
            })
            .await
            .inspect_err(|e| tracing::error!("Failed to create course: {}", e))?;

        info!("Created course '{}' ({})", course.name, course.id);
        Ok(CourseDto::from(course))
    }

    pub async fn create_city(&self, form: CreateCityForm) -> Result<CityDto> {
        form.validate()
            .map_err(|e| AppError::Validation(format_validation_errors(&e)))?;
        let image = accept_image(form.image)?;

        let image_url = self.store_image(CITY_IMAGE_FOLDER, image).await?;

        let inserted = self
            .store
            .insert_city(NewCity {
                name: form.name.trim().to_string(),
                description: form.description.trim().to_string(),
                image_url: image_url.clone(),
            })
            .await;
        let city = match inserted {
            Ok(city) => city,
            Err(e) => {
                tracing::error!("Failed to create city: {}", e);
                self.discard_image(&image_url).await;
                return Err(e);
            }
        };

        info!("Created city '{}' ({})", city.name, city.id);
        Ok(CityDto::from(city))
    }

    /// Create a college after checking that its city and courses exist.
    ///
    /// Course ids are stored exactly as submitted, duplicates included.
    pub async fn create_college(&self, form: CreateCollegeForm) -> Result<CollegeDto> {
        let parsed = form.parse()?;
        let image = accept_image(form.image)?;

        let city = self
            .store
            .find_city(parsed.city_id)
            .await
            .inspect_err(|e| tracing::error!("Failed to look up city: {}", e))?
            .ok_or_else(|| {
                AppError::Validation(format!("City '{}' does not exist", parsed.city_id))
            })?;

        let courses = self.resolve_courses(&parsed.course_ids).await?;

        let image_url = self.store_image(COLLEGE_IMAGE_FOLDER, image).await?;

        let inserted = self
            .store
            .insert_college(NewCollege {
                name: parsed.name,
                description: parsed.description,
                image_url: image_url.clone(),
                fees: parsed.fees,
                rank: parsed.rank,
                location: parsed.location,
                city_id: city.id,
                course_ids: parsed.course_ids.clone(),
            })
            .await;
        let college = match inserted {
            Ok(college) => college,
            Err(e) => {
                tracing::error!("Failed to create college: {}", e);
                self.discard_image(&image_url).await;
                return Err(e);
            }
        };

        info!("Created college '{}' ({})", college.name, college.id);

        let city = EntityRefDto {
            id: city.id,
            name: city.name,
        };
        let courses = parsed
            .course_ids
            .iter()
            .filter_map(|id| courses.get(id).cloned())
            .collect();

        Ok(CollegeDto::resolved(college, Some(city), courses))
    }

    /// Look up every referenced course, failing on the first unknown ids
    async fn resolve_courses(&self, course_ids: &[Uuid]) -> Result<HashMap<Uuid, EntityRefDto>> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = course_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let found: HashMap<Uuid, EntityRefDto> = self
            .store
            .course_refs(&unique)
            .await
            .inspect_err(|e| tracing::error!("Failed to look up courses: {}", e))?
            .into_iter()
            .map(|r| (r.id, EntityRefDto::from(r)))
            .collect();

        let missing: Vec<String> = unique
            .iter()
            .filter(|id| !found.contains_key(id))
            .map(Uuid::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Unknown course id(s): {}",
                missing.join(", ")
            )));
        }

        Ok(found)
    }

    /// Store an accepted image and return its key, or an empty key without one
    async fn store_image(&self, folder: &str, image: Option<AcceptedImage>) -> Result<String> {
        let Some(image) = image else {
            return Ok(String::new());
        };

        self.storage
            .store_image(
                folder,
                image.extension,
                image.upload.data,
                &image.upload.content_type,
            )
            .await
    }

    /// Remove an image whose record was never written; failures only warn
    async fn discard_image(&self, key: &str) {
        if key.is_empty() {
            return;
        }

        match self.storage.delete_image(key).await {
            Ok(()) => debug!("Removed orphaned image '{}'", key),
            Err(e) => warn!("Failed to remove orphaned image '{}': {}", key, e),
        }
    }
}

/// Check type and size of an optional upload; an empty part means no image
fn accept_image(upload: Option<ImageUpload>) -> Result<Option<AcceptedImage>> {
    let Some(upload) = upload.filter(|u| !u.data.is_empty()) else {
        return Ok(None);
    };

    if !ALLOWED_IMAGE_TYPES.contains(&upload.content_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported image type '{}'. Allowed: {}",
            upload.content_type,
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }

    if upload.data.len() > MAX_IMAGE_SIZE {
        return Err(AppError::Validation(format!(
            "Image exceeds the maximum size of {} MiB",
            MAX_IMAGE_SIZE / (1024 * 1024)
        )));
    }

    let extension = image_extension(&upload.content_type).ok_or_else(|| {
        AppError::Validation(format!("Unsupported image type '{}'", upload.content_type))
    })?;

    Ok(Some(AcceptedImage { upload, extension }))
}
