/// Issuer claim stamped on every admin access token
pub const TOKEN_ISSUER: &str = "college-directory";

/// Role claim required on write requests
pub const ROLE_ADMIN: &str = "admin";

/// Maximum accepted image upload size in bytes (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Image MIME types accepted for college and city pictures
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
