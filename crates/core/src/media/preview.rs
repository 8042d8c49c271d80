//! Shared registry of staged files.
//!
//! A staged file is the in-memory preview resource created when an admin
//! selects an image. Entries are addressed by an opaque token, served back
//! for preview, and released when the selection is removed, committed, or
//! abandoned long enough to be purged.

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A locally selected file that has not been transmitted to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Original filename (used for the storage key extension).
    pub filename: String,
    /// MIME type reported at selection time.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
}

impl StagedFile {
    /// Creates a staged file.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone)]
struct StagedEntry {
    file: StagedFile,
    staged_at: DateTime<Utc>,
}

/// Shared staged-file registry.
///
/// Cloning is cheap; all clones address the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    entries: Arc<DashMap<Uuid, StagedEntry>>,
}

impl PreviewStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a staged file and returns its preview token.
    #[must_use]
    pub fn insert(&self, file: StagedFile) -> Uuid {
        let token = Uuid::new_v4();
        self.entries.insert(
            token,
            StagedEntry {
                file,
                staged_at: Utc::now(),
            },
        );
        token
    }

    /// Looks up a staged file without consuming it.
    #[must_use]
    pub fn get(&self, token: Uuid) -> Option<StagedFile> {
        self.entries.get(&token).map(|e| e.file.clone())
    }

    /// Releases a staged entry. Idempotent; returns whether an entry existed.
    pub fn release(&self, token: Uuid) -> bool {
        self.entries.remove(&token).is_some()
    }

    /// Number of live staged entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries staged longer ago than `max_age`, returning how many
    /// were removed. Run periodically so abandoned selections do not leak.
    pub fn purge_stale(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.staged_at >= cutoff);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(bytes: &'static [u8]) -> StagedFile {
        StagedFile::new("photo.png", "image/png", Bytes::from_static(bytes))
    }

    #[test]
    fn test_insert_get_release() {
        let store = PreviewStore::new();
        let token = store.insert(staged(b"abc"));

        let file = store.get(token).expect("entry exists");
        assert_eq!(file.filename, "photo.png");
        assert_eq!(file.size(), 3);

        assert!(store.release(token));
        assert!(store.get(token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_release_is_idempotent() {
        let store = PreviewStore::new();
        let token = store.insert(staged(b"abc"));

        assert!(store.release(token));
        assert!(!store.release(token));
    }

    #[test]
    fn test_get_unknown_token() {
        let store = PreviewStore::new();
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_purge_stale_keeps_fresh_entries() {
        let store = PreviewStore::new();
        let token = store.insert(staged(b"abc"));

        // nothing is older than an hour yet
        assert_eq!(store.purge_stale(Duration::hours(1)), 0);
        assert!(store.get(token).is_some());

        std::thread::sleep(std::time::Duration::from_millis(5));

        // entries older than 1ms are gone
        assert_eq!(store.purge_stale(Duration::milliseconds(1)), 1);
        assert!(store.get(token).is_none());
    }
}
