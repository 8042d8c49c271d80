//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{ErrorKind, Operator, services};
use tracing::debug;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// A successfully stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Storage key within the bucket.
    pub key: String,
    /// Publicly resolvable URL for the object.
    pub url: String,
}

/// Storage service for uploaded media.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Generate a storage key for an upload.
    ///
    /// Format: `{folder}/{timestamp_millis}.{ext}`. The millisecond timestamp
    /// keeps keys collision-free without any coordination between writers.
    #[must_use]
    pub fn generate_object_key(folder: &str, filename: &str, at: DateTime<Utc>) -> String {
        let folder = folder.trim_matches('/');
        let ext = file_extension(filename);
        format!("{folder}/{}.{ext}", at.timestamp_millis())
    }

    /// Upload a file and return its durable public URL.
    ///
    /// Validates the upload against the configured constraints before any
    /// network I/O.
    ///
    /// # Errors
    ///
    /// Returns a validation error for oversized or non-image files, or an
    /// operation error if the write fails.
    pub async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, StorageError> {
        self.config
            .check_upload(content_type, bytes.len() as u64)?;

        let key = Self::generate_object_key(folder, filename, Utc::now());

        self.operator
            .write_with(&key, bytes)
            .content_type(content_type)
            .await
            .map_err(StorageError::from)?;

        let url = self.public_url(&key);
        debug!(key = %key, url = %url, "uploaded object");

        Ok(StoredObject { key, url })
    }

    /// Resolve the public URL for a storage key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.config.public_base_url)
    }

    /// Delete a file from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Extract a safe lowercase extension from a filename.
///
/// Only ASCII alphanumeric characters survive; anything else (or a missing
/// extension) falls back to `bin`.
fn file_extension(filename: &str) -> String {
    let ext: String = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();

    if ext.is_empty() { "bin".to_string() } else { ext }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Property: object keys always live inside the requested folder and
    // carry a sanitized extension.
    proptest! {
        #[test]
        fn prop_object_key_format(
            filename in "[a-zA-Z0-9_ -]{1,30}\\.[a-zA-Z0-9]{1,6}",
            millis in 0i64..4_102_444_800_000,
        ) {
            let at = DateTime::<Utc>::from_timestamp_millis(millis).expect("in range");
            let key = StorageService::generate_object_key("gallery", &filename, at);

            let parts: Vec<&str> = key.split('/').collect();
            prop_assert_eq!(parts.len(), 2);
            prop_assert_eq!(parts[0], "gallery");

            let (stem, ext) = parts[1].rsplit_once('.').expect("has extension");
            prop_assert_eq!(stem, millis.to_string());
            prop_assert!(ext.chars().all(|c| c.is_ascii_alphanumeric()));
            prop_assert!(!ext.is_empty());
        }
    }

    // Property: extension sanitization never emits unsafe characters.
    proptest! {
        #[test]
        fn prop_extension_safe_chars(filename in ".*") {
            let ext = file_extension(&filename);
            prop_assert!(!ext.is_empty());
            prop_assert!(ext.len() <= 8);
            prop_assert!(ext.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    // Property: the size gate is exact at the configured boundary.
    proptest! {
        #[test]
        fn prop_size_validation(
            max_size in 1u64..10_000_000,
            file_size in 0u64..20_000_000,
        ) {
            let config = StorageConfig::new(
                StorageProvider::local_fs("./test"),
                "http://cdn",
            )
            .with_max_file_size(max_size);

            let result = config.check_upload("image/png", file_size);

            if file_size <= max_size {
                prop_assert!(result.is_ok());
            } else {
                let is_too_large = matches!(result, Err(StorageError::FileTooLarge { .. }));
                prop_assert!(is_too_large);
            }
        }
    }

    // Property: only MIME types under the accepted prefix pass.
    proptest! {
        #[test]
        fn prop_mime_prefix_validation(mime in "[a-z]{1,12}/[a-z0-9.+-]{1,20}") {
            let config = StorageConfig::new(
                StorageProvider::local_fs("./test"),
                "http://cdn",
            );

            let result = config.check_upload(&mime, 1024);
            if mime.starts_with("image/") {
                prop_assert!(result.is_ok());
            } else {
                let is_invalid_mime = matches!(result, Err(StorageError::InvalidMimeType { .. }));
                prop_assert!(is_invalid_mime);
            }
        }
    }
}
