//! Media staging error types.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Errors from the media staging component.
#[derive(Debug, Error)]
pub enum MediaError {
    /// File size exceeds the maximum allowed.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type is not an accepted image type.
    #[error("MIME type '{content_type}' is not an accepted image type")]
    InvalidMimeType {
        /// The rejected MIME type.
        content_type: String,
    },

    /// No staged media exists for the given token.
    #[error("no staged media for token {0}")]
    UnknownToken(Uuid),

    /// Upload to object storage failed. The staged file is retained so the
    /// caller can retry.
    #[error("upload failed: {0}")]
    Upload(StorageError),
}

impl MediaError {
    /// True for errors the user can fix by picking a different file.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::FileTooLarge { .. } | Self::InvalidMimeType { .. }
        )
    }
}

impl From<StorageError> for MediaError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileTooLarge { size, max } => Self::FileTooLarge { size, max },
            StorageError::InvalidMimeType { content_type } => {
                Self::InvalidMimeType { content_type }
            }
            other => Self::Upload(other),
        }
    }
}
