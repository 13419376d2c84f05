//! Public college catalog.
//!
//! Read-only browsing of colleges, courses and cities. Every college in a
//! response carries its city and courses resolved to `{id, name}`; course and
//! city lists carry a `collegeCount` computed at read time.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/public/colleges` | List colleges (`course`, `city`, `rank` filters) |
//! | GET | `/api/public/colleges/{id}` | Get college |
//! | GET | `/api/public/colleges/by-course/{course_id}` | Colleges offering a course |
//! | GET | `/api/public/colleges/by-city/{city_id}` | Colleges in a city |
//! | GET | `/api/public/courses` | List courses with college counts |
//! | GET | `/api/public/courses/{id}` | Course with its colleges |
//! | GET | `/api/public/cities` | List cities with college counts |
//! | GET | `/api/public/cities/{id}` | City with its colleges |
//! | GET | `/api/public/settings` | Public API and storage origins |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use routes::routes;
pub use services::CatalogService;
pub use store::{CatalogStore, PgCatalogStore};
