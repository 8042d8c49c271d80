//! Draft validation errors.

use thiserror::Error;

/// Validation errors raised before a draft is persisted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// A required text field is empty.
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Testimonial rating outside the 1-5 scale.
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i16),

    /// Program price below zero.
    #[error("price must not be negative")]
    NegativePrice,
}

impl DraftError {
    /// Create a missing-field error.
    #[must_use]
    pub const fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
