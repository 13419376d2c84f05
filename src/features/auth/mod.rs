//! Admin authentication
//!
//! Admin clients log in with the configured credential pair and receive an
//! HS256 bearer token. Every `/api/admin/*` route and `/api/auth/me` sit
//! behind [`crate::core::middleware::auth_middleware`], which validates the
//! token with [`JwtValidator`].

mod validator;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use model::AuthenticatedAdmin;
pub use services::{AuthService, TokenService};
pub use validator::JwtValidator;
