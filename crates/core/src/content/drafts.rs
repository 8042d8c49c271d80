//! Entity drafts.
//!
//! A draft is the in-memory, not-yet-persisted form of an entity being
//! created (no id) or edited (id present). Media is deliberately absent
//! here: the image URL travels through the staging component and reaches
//! the repository only at save time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::error::DraftError;

fn require(field: &'static str, value: &str) -> Result<(), DraftError> {
    if value.trim().is_empty() {
        return Err(DraftError::missing(field));
    }
    Ok(())
}

/// Draft of an academy event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
    /// Identity of the record being edited, absent when creating.
    pub id: Option<Uuid>,
    /// Event title.
    pub title: String,
    /// Short excerpt shown in listings.
    pub excerpt: String,
    /// Full event content.
    pub content: String,
    /// Date the event takes place.
    pub date: NaiveDate,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EventDraft {
    /// Storage folder for event images.
    pub const MEDIA_FOLDER: &'static str = "events";

    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is empty.
    pub fn validate(&self) -> Result<(), DraftError> {
        require("title", &self.title)?;
        require("excerpt", &self.excerpt)?;
        require("content", &self.content)?;
        Ok(())
    }
}

/// Draft of a student testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialDraft {
    /// Identity of the record being edited, absent when creating.
    pub id: Option<Uuid>,
    /// Student name.
    pub name: String,
    /// Testimonial content.
    pub content: String,
    /// Belt level of the student.
    pub belt_level: String,
    /// Rating on a 1-5 scale.
    pub rating: i16,
}

impl TestimonialDraft {
    /// Storage folder for testimonial photos.
    pub const MEDIA_FOLDER: &'static str = "testimonials";

    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is empty or the rating is
    /// outside 1-5.
    pub fn validate(&self) -> Result<(), DraftError> {
        require("name", &self.name)?;
        require("content", &self.content)?;
        require("belt_level", &self.belt_level)?;
        if !(1..=5).contains(&self.rating) {
            return Err(DraftError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

/// Draft of a training program.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramDraft {
    /// Identity of the record being edited, absent when creating.
    pub id: Option<Uuid>,
    /// Program name.
    pub name: String,
    /// Program description.
    pub description: String,
    /// Monthly price.
    pub price: Decimal,
    /// Feature bullet points.
    #[serde(default)]
    pub features: Vec<String>,
}

impl ProgramDraft {
    /// Storage folder for program images.
    pub const MEDIA_FOLDER: &'static str = "programs";

    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is empty or the price is
    /// negative.
    pub fn validate(&self) -> Result<(), DraftError> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        if self.price.is_sign_negative() {
            return Err(DraftError::NegativePrice);
        }
        Ok(())
    }
}

/// Draft of a gallery image record.
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImageDraft {
    /// Identity of the record being edited, absent when creating.
    pub id: Option<Uuid>,
    /// Image title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Gallery section the image belongs to.
    pub section: String,
    /// Sort position within the gallery.
    #[serde(default)]
    pub display_order: i32,
}

impl GalleryImageDraft {
    /// Storage folder for gallery images.
    pub const MEDIA_FOLDER: &'static str = "gallery";

    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is empty.
    pub fn validate(&self) -> Result<(), DraftError> {
        require("title", &self.title)?;
        require("section", &self.section)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn event() -> EventDraft {
        EventDraft {
            id: None,
            title: "Summer belt grading".to_string(),
            excerpt: "Grading for all belts".to_string(),
            content: "Full day grading at the main dojo.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 22).unwrap(),
            tags: vec!["grading".to_string()],
        }
    }

    #[test]
    fn test_event_draft_valid() {
        assert!(event().validate().is_ok());
    }

    #[rstest]
    #[case("title")]
    #[case("excerpt")]
    #[case("content")]
    fn test_event_draft_blank_field_rejected(#[case] field: &'static str) {
        let mut draft = event();
        match field {
            "title" => draft.title = "   ".to_string(),
            "excerpt" => draft.excerpt = String::new(),
            _ => draft.content = "\t".to_string(),
        }
        assert_eq!(draft.validate(), Err(DraftError::missing(field)));
    }

    #[rstest]
    #[case(1, true)]
    #[case(5, true)]
    #[case(0, false)]
    #[case(6, false)]
    #[case(-1, false)]
    fn test_testimonial_rating_bounds(#[case] rating: i16, #[case] valid: bool) {
        let draft = TestimonialDraft {
            id: None,
            name: "Ayu".to_string(),
            content: "Great classes".to_string(),
            belt_level: "Brown Belt".to_string(),
            rating,
        };

        if valid {
            assert!(draft.validate().is_ok());
        } else {
            assert_eq!(draft.validate(), Err(DraftError::RatingOutOfRange(rating)));
        }
    }

    #[test]
    fn test_program_price_must_not_be_negative() {
        let mut draft = ProgramDraft {
            id: None,
            name: "Kyumino".to_string(),
            description: "Beginner program".to_string(),
            price: dec!(49.00),
            features: vec!["2 classes / week".to_string()],
        };
        assert!(draft.validate().is_ok());

        draft.price = dec!(-1);
        assert_eq!(draft.validate(), Err(DraftError::NegativePrice));
    }

    #[test]
    fn test_gallery_draft_requires_section() {
        let draft = GalleryImageDraft {
            id: None,
            title: "Dojo opening".to_string(),
            description: None,
            section: String::new(),
            display_order: 0,
        };
        assert_eq!(draft.validate(), Err(DraftError::missing("section")));
    }
}
