//! NSK API Server
//!
//! Main entry point for the NSK backend service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nsk_api::{AppState, create_router};
use nsk_core::media::PreviewStore;
use nsk_core::storage::{StorageConfig, StorageProvider, StorageService};
use nsk_db::connect;
use nsk_shared::config::{StorageProviderSettings, StorageSettings};
use nsk_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "nsk_api=debug,nsk_core=debug,nsk_db=debug,tower_http=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create storage service (media uploads disabled when not configured)
    let storage = match &config.storage {
        Some(settings) => {
            let service = StorageService::from_config(storage_config(settings))
                .context("Failed to initialize object storage")?;
            info!(provider = service.provider_name(), "Object storage configured");
            Some(Arc::new(service))
        }
        None => {
            info!("Object storage not configured; media uploads disabled");
            None
        }
    };

    // Staged-media registry with a periodic purge of abandoned entries
    let previews = PreviewStore::new();
    let staged_ttl = config
        .storage
        .as_ref()
        .map_or(1800, |settings| settings.staged_ttl_secs);
    spawn_purge_task(previews.clone(), staged_ttl);

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
        previews,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Maps configuration settings onto the storage service config.
fn storage_config(settings: &StorageSettings) -> StorageConfig {
    let provider = match &settings.provider {
        StorageProviderSettings::S3 {
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        } => StorageProvider::s3(endpoint, bucket, access_key_id, secret_access_key, region),
        StorageProviderSettings::AzureBlob {
            account,
            access_key,
            container,
        } => StorageProvider::azure_blob(account, access_key, container),
        StorageProviderSettings::LocalFs { root } => StorageProvider::local_fs(root),
    };

    StorageConfig::new(provider, settings.public_base_url.clone())
        .with_max_file_size(settings.max_upload_size)
}

/// Periodically drops staged media that was never saved or discarded.
fn spawn_purge_task(previews: PreviewStore, ttl_secs: u64) {
    let interval = Duration::from_secs(ttl_secs.max(60) / 2);
    let max_age = chrono::Duration::seconds(i64::try_from(ttl_secs).unwrap_or(1800));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let purged = previews.purge_stale(max_age);
            if purged > 0 {
                info!(purged, "purged abandoned staged media");
            }
        }
    });
}
