//! Deferred media-upload protocol.
//!
//! Image selection and upload are decoupled: a picked file is *staged*
//! (validated and previewable, no network I/O) and only *committed* -
//! uploaded to object storage and resolved to a durable URL - when the
//! record that owns it is saved. Cancelled edits therefore never leave
//! orphaned objects in storage.
//!
//! The pieces:
//!
//! - [`PreviewStore`] - shared registry of staged files, the backing for
//!   preview serving and cross-request staging
//! - [`UploadStaging`] - the per-form staging component: select, commit,
//!   remove
//! - [`save_with_media`] - the save protocol: commit strictly before the
//!   record persist, abort on commit failure

mod error;
mod form;
mod preview;
mod staging;

pub use error::MediaError;
pub use form::{SaveError, save_with_media};
pub use preview::{PreviewStore, StagedFile};
pub use staging::{CommittedMedia, MediaChange, MediaSlot, PendingMedia, UploadStaging};
