//! Catalog submissions (admin only).
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Body |
//! |--------|----------|------|
//! | POST | `/api/admin/colleges` | multipart: fields, `courseIds` JSON, `collegeImage` |
//! | POST | `/api/admin/courses` | JSON `{name, description, avgFees}` |
//! | POST | `/api/admin/cities` | multipart: fields, `cityImage` |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
