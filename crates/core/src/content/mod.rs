//! Content domain: drafts, validation, and submissions analytics.

pub mod analytics;
mod drafts;
mod error;

pub use analytics::{AdmissionEntry, ContactEntry, SubmissionStats, TopClass, summarize};
pub use drafts::{EventDraft, GalleryImageDraft, ProgramDraft, TestimonialDraft};
pub use error::DraftError;
