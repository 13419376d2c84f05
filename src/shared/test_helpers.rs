use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::{AuthenticatedAdmin, TokenService};
use crate::modules::storage::ImageStorage;
use crate::shared::constants::ROLE_ADMIN;

pub const TEST_SECRET: &str = "test-secret-that-is-at-least-32-bytes!";

pub fn create_admin() -> AuthenticatedAdmin {
    AuthenticatedAdmin {
        sub: "test-admin".to_string(),
        role: ROLE_ADMIN.to_string(),
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin());
    next.run(request).await
}

/// Wrap a router so every request carries an authenticated admin
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Bearer token signed with [`TEST_SECRET`]
pub fn admin_token() -> String {
    TokenService::new(TEST_SECRET, Duration::from_secs(3600))
        .issue("test-admin")
        .map(|r| r.access_token)
        .unwrap()
}

/// Stored object captured by [`MemoryImageStorage`]
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// In-memory image storage with a switch to simulate an outage
#[derive(Default)]
pub struct MemoryImageStorage {
    images: Mutex<Vec<StoredImage>>,
    unavailable: AtomicBool,
}

impl MemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn stored_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn stored(&self) -> Vec<StoredImage> {
        self.images.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn store_image(
        &self,
        folder: &str,
        extension: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable(
                "Image storage is unavailable".to_string(),
            ));
        }

        let key = format!("{}/{}.{}", folder, Uuid::now_v7(), extension);
        self.images.lock().unwrap().push(StoredImage {
            key: key.clone(),
            content_type: content_type.to_string(),
            size: data.len(),
        });
        Ok(key)
    }

    async fn delete_image(&self, key: &str) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable(
                "Image storage is unavailable".to_string(),
            ));
        }

        self.images.lock().unwrap().retain(|image| image.key != key);
        Ok(())
    }
}
