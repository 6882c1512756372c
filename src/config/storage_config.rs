//! Object storage (S3-compatible) settings for media uploads.

use std::env;

pub struct StorageConfig;

impl StorageConfig {
    pub fn bucket() -> String {
        env::var("S3_BUCKET").unwrap_or_else(|_| "learnsphere-media".to_string())
    }

    pub fn region() -> String {
        env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string())
    }

    /// Custom endpoint for S3-compatible providers (MinIO and the like).
    pub fn endpoint() -> Option<String> {
        env::var("S3_ENDPOINT").ok()
    }

    pub fn access_key() -> String {
        env::var("S3_ACCESS_KEY").unwrap_or_default()
    }

    pub fn secret_key() -> String {
        env::var("S3_SECRET_KEY").unwrap_or_default()
    }

    /// Public URL prefix for uploaded objects. Defaults to the virtual-hosted
    /// S3 URL for the configured bucket and region.
    pub fn public_base_url() -> String {
        env::var("S3_PUBLIC_BASE_URL").unwrap_or_else(|_| {
            format!(
                "https://{}.s3.{}.amazonaws.com",
                Self::bucket(),
                Self::region()
            )
        })
    }
}
