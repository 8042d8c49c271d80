//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logging and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Base URL from which uploaded objects are publicly served.
    pub public_base_url: String,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Accepted MIME type prefix for uploads.
    pub accepted_mime_prefix: String,
}

impl StorageConfig {
    /// Default max file size: 5 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
    /// Default accepted MIME prefix: images only.
    pub const DEFAULT_MIME_PREFIX: &'static str = "image/";

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider, public_base_url: impl Into<String>) -> Self {
        let public_base_url: String = public_base_url.into();
        Self {
            provider,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            accepted_mime_prefix: Self::DEFAULT_MIME_PREFIX.to_string(),
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the accepted MIME type prefix.
    #[must_use]
    pub fn with_mime_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.accepted_mime_prefix = prefix.into();
        self
    }

    /// Validate an upload against the configured constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is too large or not an accepted image type.
    pub fn check_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.max_file_size {
            return Err(StorageError::file_too_large(size, self.max_file_size));
        }

        if !content_type.starts_with(&self.accepted_mime_prefix) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_s3() {
        let provider = StorageProvider::s3(
            "https://account.r2.cloudflarestorage.com",
            "contents",
            "access_key",
            "secret_key",
            "auto",
        );
        assert_eq!(provider.name(), "s3");
        assert_eq!(provider.bucket(), "contents");
    }

    #[test]
    fn test_storage_provider_azure() {
        let provider = StorageProvider::azure_blob("nskdev", "access_key", "contents");
        assert_eq!(provider.name(), "azure_blob");
        assert_eq!(provider.bucket(), "contents");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(
            StorageProvider::local_fs("./storage"),
            "http://localhost:8080/media/",
        );
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.accepted_mime_prefix, "image/");
        // trailing slash is trimmed so key joining stays predictable
        assert_eq!(config.public_base_url, "http://localhost:8080/media");
    }

    #[test]
    fn test_check_upload_size() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"), "http://cdn")
            .with_max_file_size(1024);

        assert!(config.check_upload("image/png", 512).is_ok());
        let err = config.check_upload("image/png", 2048).unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
    }

    #[test]
    fn test_check_upload_mime_prefix() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"), "http://cdn");

        assert!(config.check_upload("image/png", 1024).is_ok());
        assert!(config.check_upload("image/webp", 1024).is_ok());

        let err = config.check_upload("application/pdf", 1024).unwrap_err();
        assert!(matches!(err, StorageError::InvalidMimeType { .. }));
    }
}
