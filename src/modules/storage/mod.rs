//! Storage module for uploaded images
//!
//! Provides the [`ImageStorage`] port and its MinIO/S3-compatible adapter.

mod minio_client;

pub use minio_client::MinIOClient;

use async_trait::async_trait;

use crate::core::error::Result;

/// Binary storage for uploaded images
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `data` under `folder` and return the store-relative key.
    ///
    /// `extension` is appended to a freshly generated file name.
    async fn store_image(
        &self,
        folder: &str,
        extension: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    /// Remove a previously stored image by its key
    async fn delete_image(&self, key: &str) -> Result<()>;
}
