//! Repository abstractions for data access.

mod admin_user;
mod event;
mod gallery;
mod program;
mod submission;
mod testimonial;

pub use admin_user::AdminUserRepository;
pub use event::EventRepository;
pub use gallery::GalleryRepository;
pub use program::ProgramRepository;
pub use submission::{NewAdmission, NewContact, SubmissionRepository};
pub use testimonial::TestimonialRepository;

/// Converts a JSONB string-array column back into a `Vec<String>`.
///
/// Non-string elements are skipped; a non-array value yields an empty list.
#[must_use]
pub fn json_string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(ToString::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_string_list_roundtrip() {
        let value = json!(["grading", "tournament"]);
        assert_eq!(
            json_string_list(&value),
            vec!["grading".to_string(), "tournament".to_string()]
        );
    }

    #[test]
    fn test_json_string_list_skips_non_strings() {
        let value = json!(["ok", 42, null]);
        assert_eq!(json_string_list(&value), vec!["ok".to_string()]);
    }

    #[test]
    fn test_json_string_list_non_array() {
        assert_eq!(json_string_list(&json!("nope")), Vec::<String>::new());
    }
}
