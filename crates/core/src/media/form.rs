//! The form-host save protocol.
//!
//! Saving a draft that may carry staged media happens in a strict order:
//! the media commit completes first, and only then is the record persisted
//! with the durable URL. A failed commit aborts the save before anything is
//! written, so no record ever references a URL that does not exist. A failed
//! persist after a successful commit leaves the uploaded object in storage;
//! there is no compensating delete.

use thiserror::Error;

use super::error::MediaError;
use super::staging::UploadStaging;

/// Errors from a save-with-media operation.
#[derive(Debug, Error)]
pub enum SaveError<E>
where
    E: std::error::Error,
{
    /// The media commit failed; the record was not written.
    #[error("media commit failed: {0}")]
    Media(#[source] MediaError),

    /// The record persist failed after a successful media commit.
    #[error("record persist failed: {0}")]
    Persist(#[source] E),
}

impl<E> SaveError<E>
where
    E: std::error::Error,
{
    /// True when the failure is a locally correctable validation problem.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Media(err) if err.is_validation())
    }
}

/// Runs the save protocol: commit staged media, then persist the record.
///
/// `persist` receives the durable media URL (or `None` when the draft
/// carries no media) and performs the entity upsert. It is never invoked
/// when the commit fails.
///
/// # Errors
///
/// `SaveError::Media` when the commit fails (record untouched),
/// `SaveError::Persist` when the upsert fails (uploaded media stays valid
/// in storage).
pub async fn save_with_media<T, E, F, Fut>(
    staging: &mut UploadStaging,
    persist: F,
) -> Result<T, SaveError<E>>
where
    E: std::error::Error,
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let committed = staging.commit().await.map_err(SaveError::Media)?;

    persist(committed.map(|media| media.url))
        .await
        .map_err(SaveError::Persist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{PreviewStore, StagedFile};
    use crate::storage::{StorageConfig, StorageProvider, StorageService};
    use bytes::Bytes;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Debug, Error)]
    #[error("persist blew up")]
    struct PersistFailure;

    fn temp_root() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("nsk-form-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn working_staging(previews: PreviewStore) -> UploadStaging {
        let config = StorageConfig::new(
            StorageProvider::local_fs(temp_root()),
            "http://localhost:8080/media",
        );
        let storage = Arc::new(StorageService::from_config(config).expect("create storage"));
        UploadStaging::new(storage, previews, "programs")
    }

    fn broken_staging(previews: PreviewStore) -> UploadStaging {
        let config = StorageConfig::new(
            StorageProvider::local_fs("/dev/null/uploads"),
            "http://localhost:8080/media",
        );
        let storage = Arc::new(StorageService::from_config(config).expect("create storage"));
        UploadStaging::new(storage, previews, "programs")
    }

    fn image() -> StagedFile {
        StagedFile::new("belt.png", "image/png", Bytes::from_static(b"\x89PNG"))
    }

    #[tokio::test]
    async fn test_save_commits_before_persist() {
        let mut staging = working_staging(PreviewStore::new());
        staging.select_file(image()).expect("valid file");

        let url = save_with_media::<_, PersistFailure, _, _>(&mut staging, |url| async move {
            // by the time persist runs, the URL is durable
            Ok(url)
        })
        .await
        .expect("save succeeds")
        .expect("media url present");

        assert!(url.starts_with("http://localhost:8080/media/programs/"));
    }

    #[tokio::test]
    async fn test_commit_failure_skips_persist() {
        let mut staging = broken_staging(PreviewStore::new());
        staging.select_file(image()).expect("valid file");

        let persist_calls = Arc::new(AtomicUsize::new(0));
        let calls = Arc::clone(&persist_calls);

        let result = save_with_media::<(), PersistFailure, _, _>(&mut staging, |_| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(SaveError::Media(_))));
        assert_eq!(persist_calls.load(Ordering::SeqCst), 0);
        // the selection is still staged for retry
        assert!(staging.has_pending());
    }

    #[tokio::test]
    async fn test_persist_failure_reported_after_commit() {
        let mut staging = working_staging(PreviewStore::new());
        staging.select_file(image()).expect("valid file");

        let result = save_with_media::<(), PersistFailure, _, _>(&mut staging, |_| async {
            Err(PersistFailure)
        })
        .await;

        assert!(matches!(result, Err(SaveError::Persist(PersistFailure))));
        // the media stayed committed; a retry of the save reuses the URL
        assert!(staging.committed_url().is_some());
    }

    #[tokio::test]
    async fn test_save_without_media_persists_none() {
        let mut staging = working_staging(PreviewStore::new());

        let url = save_with_media::<_, PersistFailure, _, _>(&mut staging, |url| async move {
            Ok(url)
        })
        .await
        .expect("save succeeds");

        assert!(url.is_none());
    }

    #[tokio::test]
    async fn test_removed_media_saves_none_after_prior_commit() {
        let mut staging = working_staging(PreviewStore::new());
        staging.select_file(image()).expect("valid file");
        staging.commit().await.expect("commit");

        staging.remove();

        let url = save_with_media::<_, PersistFailure, _, _>(&mut staging, |url| async move {
            Ok(url)
        })
        .await
        .expect("save succeeds");

        assert!(url.is_none());
    }
}
