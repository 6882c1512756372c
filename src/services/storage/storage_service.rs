//! Object storage for course media (videos, thumbnails, profile pictures).
//!
//! Talks to S3 or any S3-compatible provider. The client is built lazily on
//! first use and cached for the life of the process.

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use singleton_macro::service;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::errors::errors::AppError;

static CLIENT: OnceCell<S3Client> = OnceCell::const_new();

async fn client() -> &'static S3Client {
    CLIENT
        .get_or_init(|| async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest())
                .region(aws_config::Region::new(StorageConfig::region()))
                .credentials_provider(aws_sdk_s3::config::Credentials::new(
                    StorageConfig::access_key(),
                    StorageConfig::secret_key(),
                    None,
                    None,
                    "static",
                ));

            if let Some(endpoint) = StorageConfig::endpoint() {
                loader = loader.endpoint_url(endpoint);
            }

            let base_config = loader.load().await;

            // Path-style addressing for MinIO-like providers.
            let s3_config = S3ConfigBuilder::from(&base_config)
                .force_path_style(StorageConfig::endpoint().is_some())
                .build();

            S3Client::from_conf(s3_config)
        })
        .await
}

#[service(name = "storage")]
pub struct StorageService {
    // Client lives in a process-wide OnceCell.
}

impl StorageService {
    /// Uploads a media file and returns its public URL. Keys are namespaced
    /// by folder and randomized to avoid collisions.
    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError> {
        let key = object_key(folder, file_name);

        client()
            .await
            .put_object()
            .bucket(StorageConfig::bucket())
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Upload failed: {}", e)))?;

        log::info!("uploaded {} to bucket {}", key, StorageConfig::bucket());

        Ok(format!("{}/{}", StorageConfig::public_base_url(), key))
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        client()
            .await
            .delete_object()
            .bucket(StorageConfig::bucket())
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Delete failed: {}", e)))?;

        Ok(())
    }
}

/// `{folder}/{uuid}-{sanitized-name}`. The original name is kept (sanitized)
/// so downloads have a recognizable filename.
fn object_key(folder: &str, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}/{}-{}", folder, Uuid::new_v4(), safe_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_sanitizes_and_namespaces() {
        let key = object_key("videos", "my lecture (1).mp4");
        assert!(key.starts_with("videos/"));
        assert!(key.ends_with("-my_lecture__1_.mp4"));
        assert!(!key.contains(' '));
    }
}
