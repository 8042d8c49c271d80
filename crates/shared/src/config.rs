//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Object storage configuration (media uploads are disabled when absent).
    #[serde(default)]
    pub storage: Option<StorageSettings>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Object storage configuration.
///
/// The provider section mirrors the vendor-agnostic storage backends:
/// S3-compatible, Azure Blob, or a local directory for development.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage backend to use.
    pub provider: StorageProviderSettings,
    /// Base URL from which uploaded objects are publicly served.
    pub public_base_url: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    /// Seconds after which an abandoned staged upload is purged.
    #[serde(default = "default_staged_ttl")]
    pub staged_ttl_secs: u64,
}

/// Default max upload size: 5 MiB.
fn default_max_upload_size() -> u64 {
    5 * 1024 * 1024
}

/// Default staged-upload TTL: 30 minutes.
fn default_staged_ttl() -> u64 {
    1800
}

/// Storage provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProviderSettings {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3.
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
    /// Azure Blob Storage.
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: String,
    },
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("NSK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_settings_deserialize_local() {
        let settings: StorageSettings = serde_json::from_value(serde_json::json!({
            "provider": { "type": "local_fs", "root": "./uploads" },
            "public_base_url": "http://localhost:8080/media"
        }))
        .expect("valid settings");

        assert_eq!(settings.max_upload_size, 5 * 1024 * 1024);
        assert_eq!(settings.staged_ttl_secs, 1800);
        assert!(matches!(
            settings.provider,
            StorageProviderSettings::LocalFs { .. }
        ));
    }

    #[test]
    fn test_storage_settings_deserialize_s3() {
        let settings: StorageSettings = serde_json::from_value(serde_json::json!({
            "provider": {
                "type": "s3",
                "endpoint": "https://account.r2.cloudflarestorage.com",
                "bucket": "contents",
                "access_key_id": "key",
                "secret_access_key": "secret",
                "region": "auto"
            },
            "public_base_url": "https://cdn.example.com",
            "max_upload_size": 1024
        }))
        .expect("valid settings");

        assert_eq!(settings.max_upload_size, 1024);
        assert!(matches!(settings.provider, StorageProviderSettings::S3 { .. }));
    }
}
