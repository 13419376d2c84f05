//! MinIO/S3-compatible storage client
//!
//! Uploads college and city images into a bucket whose public prefix is
//! readable anonymously, so stored keys can be served straight from the
//! storage origin.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ImageStorage;
use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Image storage backed by a MinIO/S3 bucket
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_prefix: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    /// Used for the bucket policy call, which rust-s3 does not cover
    http_client: Client,
}

impl MinIOClient {
    /// Connect to the bucket, creating it and its public-read policy when missing
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Invalid MinIO bucket: {}", e)))?;
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix,
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        };

        client.ensure_bucket_exists().await;
        client.set_public_read_policy().await;

        info!(
            "Image storage ready: endpoint={}, bucket={}, prefix={}, public origin={}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix,
            config.public_endpoint
        );

        Ok(client)
    }

    /// Create the bucket; an existing bucket is fine
    async fn ensure_bucket_exists(&self) {
        let name = self.bucket.name();
        let created = Bucket::create_with_path_style(
            &name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => info!("Bucket '{}' created", name),
            Err(e) if is_already_owned(&e.to_string()) => {
                debug!("Bucket '{}' already exists", name)
            }
            Err(e) => warn!("Could not create bucket '{}': {}. Assuming it exists.", name, e),
        }
    }

    /// Allow anonymous `GetObject` on `{bucket}/{public_prefix}/*`; failure only warns
    async fn set_public_read_policy(&self) {
        let bucket_name = self.bucket.name();
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket_name, self.public_prefix)]
            }]
        });

        match self
            .put_bucket_policy_with_sigv4(&bucket_name, &policy.to_string())
            .await
        {
            Ok(()) => info!(
                "Public read policy set for {}/{}/*",
                bucket_name, self.public_prefix
            ),
            Err(e) => warn!(
                "Failed to set bucket policy for '{}': {}. \
                Set it manually with: mc anonymous set download minio/{}/{}",
                bucket_name, e, bucket_name, self.public_prefix
            ),
        }
    }

    /// PUT the bucket policy, signed with AWS Signature v4
    async fn put_bucket_policy_with_sigv4(&self, bucket_name: &str, policy: &str) -> Result<()> {
        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = match (endpoint_url.host_str(), endpoint_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(AppError::Internal("Endpoint URL has no host".to_string())),
        };

        let signer = SigV4Request {
            method: "PUT",
            canonical_uri: format!("/{}", bucket_name),
            canonical_query: "policy=",
            host: &host,
            payload_hash: hex::encode(Sha256::digest(policy.as_bytes())),
            timestamp: Utc::now(),
        };
        let authorization =
            signer.authorization(&self.access_key, &self.secret_key, &self.region_name)?;

        let response = self
            .http_client
            .put(format!("{}/{}?policy", self.endpoint, bucket_name))
            .header("Host", &host)
            .header("x-amz-date", signer.amz_date())
            .header("x-amz-content-sha256", &signer.payload_hash)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Internal(format!(
            "Failed to set bucket policy: {} - {}",
            status, body
        )))
    }

    /// Object key for a new image: `{public_prefix}/{folder}/{uuid}.{extension}`
    fn image_key(&self, folder: &str, extension: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            self.public_prefix,
            folder,
            Uuid::now_v7(),
            extension
        )
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

fn is_already_owned(message: &str) -> bool {
    ["BucketAlreadyOwnedByYou", "BucketAlreadyExists", "already own it"]
        .iter()
        .any(|marker| message.contains(marker))
}

/// One S3 request to sign with AWS Signature v4 (headers: host, content hash, date)
struct SigV4Request<'a> {
    method: &'static str,
    canonical_uri: String,
    canonical_query: &'static str,
    host: &'a str,
    payload_hash: String,
    timestamp: DateTime<Utc>,
}

impl SigV4Request<'_> {
    const ALGORITHM: &'static str = "AWS4-HMAC-SHA256";
    const SIGNED_HEADERS: &'static str = "host;x-amz-content-sha256;x-amz-date";

    fn amz_date(&self) -> String {
        self.timestamp.format("%Y%m%dT%H%M%SZ").to_string()
    }

    fn date_stamp(&self) -> String {
        self.timestamp.format("%Y%m%d").to_string()
    }

    fn string_to_sign(&self, region: &str) -> String {
        let canonical_request = [
            self.method.to_string(),
            self.canonical_uri.clone(),
            self.canonical_query.to_string(),
            format!(
                "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
                self.host,
                self.payload_hash,
                self.amz_date()
            ),
            Self::SIGNED_HEADERS.to_string(),
            self.payload_hash.clone(),
        ]
        .join("\n");

        [
            Self::ALGORITHM.to_string(),
            self.amz_date(),
            self.credential_scope(region),
            hex::encode(Sha256::digest(canonical_request.as_bytes())),
        ]
        .join("\n")
    }

    fn credential_scope(&self, region: &str) -> String {
        format!("{}/{}/s3/aws4_request", self.date_stamp(), region)
    }

    fn authorization(&self, access_key: &str, secret_key: &str, region: &str) -> Result<String> {
        let signature = signature(
            secret_key,
            region,
            &self.date_stamp(),
            &self.string_to_sign(region),
        )?;

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            Self::ALGORITHM,
            access_key,
            self.credential_scope(region),
            Self::SIGNED_HEADERS,
            signature
        ))
    }
}

/// Derive the signing key for `date_stamp`/`region`/s3 and sign `string_to_sign`
fn signature(
    secret_key: &str,
    region: &str,
    date_stamp: &str,
    string_to_sign: &str,
) -> Result<String> {
    let mut key = format!("AWS4{}", secret_key).into_bytes();
    for part in [date_stamp, region, "s3", "aws4_request"] {
        key = hmac_sha256(&key, part.as_bytes())?;
    }
    Ok(hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[async_trait]
impl ImageStorage for MinIOClient {
    async fn store_image(
        &self,
        folder: &str,
        extension: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let key = self.image_key(folder, extension);

        let response = self
            .bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upload image '{}': {}", key, e);
                AppError::Unavailable("Image storage is unavailable".to_string())
            })?;

        if !(200..300).contains(&response.status_code()) {
            tracing::error!(
                "Image upload '{}' rejected with status {}",
                key,
                response.status_code()
            );
            return Err(AppError::Unavailable(
                "Image storage is unavailable".to_string(),
            ));
        }

        debug!("Uploaded image '{}' to bucket '{}'", key, self.bucket.name());
        Ok(key)
    }

    async fn delete_image(&self, key: &str) -> Result<()> {
        let response = self.bucket.delete_object(key).await.map_err(|e| {
            tracing::error!("Failed to delete image '{}': {}", key, e);
            AppError::Unavailable("Image storage is unavailable".to_string())
        })?;

        // S3 answers 204 for deletes, including keys that were already gone
        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Unavailable(format!(
                "Image delete '{}' rejected with status {}",
                key,
                response.status_code()
            )));
        }

        debug!("Deleted image '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}
