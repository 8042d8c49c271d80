//! The upload staging component.
//!
//! One instance backs one form. It owns the media slot of the draft being
//! edited and walks it through `select -> commit` or `select -> remove`,
//! keeping the preview registry and the form host in sync at every step.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::error::MediaError;
use super::preview::{PreviewStore, StagedFile};
use crate::storage::StorageService;

/// Media carried by a draft: nothing, a staged selection, or a committed URL.
///
/// A draft never holds more than one of these at a time; every staging
/// operation replaces the slot wholesale.
#[derive(Debug, Clone, Default)]
pub enum MediaSlot {
    /// No media attached.
    #[default]
    Empty,
    /// A selected file awaiting commit.
    Pending(PendingMedia),
    /// Media uploaded to storage, addressed by its durable URL.
    Committed(CommittedMedia),
}

/// A staged selection: preview token plus the file it resolves to.
#[derive(Debug, Clone)]
pub struct PendingMedia {
    /// Preview token registered in the [`PreviewStore`].
    pub token: Uuid,
    /// The selected file.
    pub file: StagedFile,
}

/// Media that has been uploaded and resolved to a durable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedMedia {
    /// Publicly resolvable URL.
    pub url: String,
    /// Logical folder the object was uploaded under.
    pub folder: String,
}

/// Change notification delivered to the form host on every selection or
/// removal (not on commit), carrying the preview reference and the pending
/// file so host and staging state never diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaChange {
    /// A file was selected and staged under this preview token.
    Selected {
        /// Preview token of the staged file.
        token: Uuid,
        /// The pending file itself.
        file: StagedFile,
    },
    /// The media selection was cleared.
    Removed,
}

type ChangeListener = Box<dyn Fn(MediaChange) + Send + Sync>;

/// Per-form media staging component.
///
/// Exclusive (`&mut`) access is what keeps at most one upload in flight
/// per instance; there is no interior mutability to race on.
pub struct UploadStaging {
    storage: Arc<StorageService>,
    previews: PreviewStore,
    folder: String,
    slot: MediaSlot,
    on_change: Option<ChangeListener>,
}

impl std::fmt::Debug for UploadStaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStaging")
            .field("folder", &self.folder)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl UploadStaging {
    /// Creates a staging component for one form, uploading into `folder`.
    #[must_use]
    pub fn new(
        storage: Arc<StorageService>,
        previews: PreviewStore,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            previews,
            folder: folder.into(),
            slot: MediaSlot::Empty,
            on_change: None,
        }
    }

    /// Seeds the slot with media already committed on a stored record,
    /// so editing an entity starts from its current image.
    #[must_use]
    pub fn with_committed(mut self, url: Option<String>) -> Self {
        self.slot = match url {
            Some(url) => MediaSlot::Committed(CommittedMedia {
                url,
                folder: self.folder.clone(),
            }),
            None => MediaSlot::Empty,
        };
        self
    }

    /// Registers a listener invoked on every selection and removal.
    #[must_use]
    pub fn with_change_listener(
        mut self,
        listener: impl Fn(MediaChange) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    /// Stages a selected file.
    ///
    /// Validation happens first and is purely local; a rejected file leaves
    /// the slot untouched. On success any previous staged selection is
    /// released, the file is registered for preview, and the change listener
    /// is notified.
    ///
    /// # Errors
    ///
    /// Returns a validation error for oversized or non-image files.
    pub fn select_file(&mut self, file: StagedFile) -> Result<Uuid, MediaError> {
        self.storage
            .config()
            .check_upload(&file.content_type, file.size())?;

        self.release_pending();

        let token = self.previews.insert(file.clone());
        self.slot = MediaSlot::Pending(PendingMedia {
            token,
            file: file.clone(),
        });
        debug!(folder = %self.folder, token = %token, "staged media selection");

        self.notify(MediaChange::Selected { token, file });
        Ok(token)
    }

    /// Adopts a file staged in an earlier request, addressed by its preview
    /// token.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::UnknownToken` if the token does not resolve
    /// (never staged, already consumed, or purged).
    pub fn resume(&mut self, token: Uuid) -> Result<(), MediaError> {
        let file = self
            .previews
            .get(token)
            .ok_or(MediaError::UnknownToken(token))?;

        self.release_pending();
        self.slot = MediaSlot::Pending(PendingMedia { token, file });
        Ok(())
    }

    /// Commits the staged selection: uploads it and resolves the durable URL.
    ///
    /// Idempotent. With nothing staged the current state is returned
    /// unchanged - the previously committed media, or `None` when the slot
    /// is empty - without any network I/O.
    ///
    /// # Errors
    ///
    /// On upload failure the staged selection is retained so the caller can
    /// retry; no partial URL is ever exposed.
    pub async fn commit(&mut self) -> Result<Option<CommittedMedia>, MediaError> {
        let (token, file) = match &self.slot {
            MediaSlot::Empty => return Ok(None),
            MediaSlot::Committed(committed) => return Ok(Some(committed.clone())),
            MediaSlot::Pending(pending) => (pending.token, pending.file.clone()),
        };

        let stored = self
            .storage
            .upload(
                &self.folder,
                &file.filename,
                &file.content_type,
                file.bytes.clone(),
            )
            .await
            .map_err(MediaError::from)?;

        self.previews.release(token);
        let committed = CommittedMedia {
            url: stored.url,
            folder: self.folder.clone(),
        };
        self.slot = MediaSlot::Committed(committed.clone());
        debug!(folder = %self.folder, url = %committed.url, "committed media");

        Ok(Some(committed))
    }

    /// Clears the media selection and notifies the change listener.
    ///
    /// After `remove()` the next save persists the record without a media
    /// URL, regardless of what was staged or committed before.
    pub fn remove(&mut self) {
        self.release_pending();
        self.slot = MediaSlot::Empty;
        self.notify(MediaChange::Removed);
    }

    /// Discards the staging state without notifying the listener.
    ///
    /// This is the cancel/teardown path: the preview resource is released
    /// and nothing is uploaded.
    pub fn discard(&mut self) {
        self.release_pending();
        self.slot = MediaSlot::Empty;
    }

    /// Hands the staged selection off to a later request.
    ///
    /// Returns the preview token and leaves the registry entry alive, so
    /// another staging component can [`resume`](Self::resume) it. Without a
    /// staged selection this is `None` and teardown proceeds as usual.
    #[must_use]
    pub fn detach(mut self) -> Option<Uuid> {
        match std::mem::take(&mut self.slot) {
            MediaSlot::Pending(pending) => Some(pending.token),
            _ => None,
        }
    }

    /// Current media slot.
    #[must_use]
    pub const fn slot(&self) -> &MediaSlot {
        &self.slot
    }

    /// True while a selection is staged but not committed.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        matches!(self.slot, MediaSlot::Pending(_))
    }

    /// URL of the committed media, if any.
    #[must_use]
    pub fn committed_url(&self) -> Option<&str> {
        match &self.slot {
            MediaSlot::Committed(committed) => Some(committed.url.as_str()),
            _ => None,
        }
    }

    fn release_pending(&mut self) {
        if let MediaSlot::Pending(pending) = &self.slot {
            self.previews.release(pending.token);
        }
    }

    fn notify(&self, change: MediaChange) {
        if let Some(listener) = &self.on_change {
            listener(change);
        }
    }
}

impl Drop for UploadStaging {
    fn drop(&mut self) {
        // teardown must release the preview resource
        self.release_pending();
    }
}
