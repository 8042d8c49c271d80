//! Visitor submission routes and the admin submissions dashboard.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use super::internal_error;
use crate::AppState;
use nsk_core::content::{AdmissionEntry, ContactEntry, SubmissionStats, summarize};
use nsk_db::SubmissionRepository;
use nsk_db::entities::{admission_forms, contact_messages};
use nsk_db::repositories::{NewAdmission, NewContact};

/// Creates the public submission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admissions", post(submit_admission))
        .route("/contact", post(submit_contact))
}

/// Creates the admin submission routes (nested under `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/submissions", get(list_submissions))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for an admission form submission.
#[derive(Debug, Deserialize, Validate)]
pub struct AdmissionRequest {
    /// Applicant name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Applicant email.
    #[validate(email)]
    pub email: String,
    /// Applicant phone number.
    #[validate(length(min = 5, max = 50))]
    pub phone: String,
    /// Applicant city.
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    /// Class the applicant wants to join.
    #[validate(length(min = 1, max = 100))]
    pub selected_class: String,
    /// Optional free-form message.
    pub message: Option<String>,
}

/// Request body for a contact message submission.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// Sender name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Sender email.
    #[validate(email)]
    pub email: String,
    /// Optional phone number.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Optional subject line.
    #[validate(length(max = 255))]
    pub subject: Option<String>,
    /// Message body.
    #[validate(length(min = 1))]
    pub message: String,
}

/// Response for a stored admission form.
#[derive(Debug, Serialize)]
pub struct AdmissionResponse {
    /// Submission ID.
    pub id: Uuid,
    /// Applicant name.
    pub name: String,
    /// Applicant email.
    pub email: String,
    /// Applicant phone number.
    pub phone: String,
    /// Applicant city.
    pub city: String,
    /// Selected class.
    pub selected_class: String,
    /// Optional message.
    pub message: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

/// Response for a stored contact message.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Submission ID.
    pub id: Uuid,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Message body.
    pub message: String,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

/// Admin dashboard payload: both submission lists plus aggregate stats.
#[derive(Debug, Serialize)]
pub struct SubmissionsResponse {
    /// Admission forms, newest first.
    pub admissions: Vec<AdmissionResponse>,
    /// Contact messages, newest first.
    pub contacts: Vec<ContactResponse>,
    /// Aggregated statistics.
    pub stats: SubmissionStats,
}

fn admission_to_response(model: admission_forms::Model) -> AdmissionResponse {
    AdmissionResponse {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        city: model.city,
        selected_class: model.selected_class,
        message: model.message,
        created_at: model.created_at.to_rfc3339(),
    }
}

fn contact_to_response(model: contact_messages::Model) -> ContactResponse {
    ContactResponse {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        subject: model.subject,
        message: model.message,
        created_at: model.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/admissions`
/// Store an admission form submission.
async fn submit_admission(
    State(state): State<AppState>,
    Json(payload): Json<AdmissionRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return super::bad_request("invalid_submission", e.to_string());
    }

    let repo = SubmissionRepository::new((*state.db).clone());
    let input = NewAdmission {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        city: payload.city,
        selected_class: payload.selected_class,
        message: payload.message,
    };

    match repo.insert_admission(input).await {
        Ok(model) => {
            info!(submission_id = %model.id, "admission form received");
            (StatusCode::CREATED, Json(admission_to_response(model))).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to store admission form");
            internal_error()
        }
    }
}

/// POST `/contact`
/// Store a contact message submission.
async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return super::bad_request("invalid_submission", e.to_string());
    }

    let repo = SubmissionRepository::new((*state.db).clone());
    let input = NewContact {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        subject: payload.subject,
        message: payload.message,
    };

    match repo.insert_contact(input).await {
        Ok(model) => {
            info!(submission_id = %model.id, "contact message received");
            (StatusCode::CREATED, Json(contact_to_response(model))).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to store contact message");
            internal_error()
        }
    }
}

/// GET `/admin/submissions`
/// Both submission lists plus the aggregated dashboard statistics.
async fn list_submissions(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SubmissionRepository::new((*state.db).clone());

    let admissions = match repo.list_admissions().await {
        Ok(models) => models,
        Err(e) => {
            error!(error = %e, "failed to list admission forms");
            return internal_error();
        }
    };
    let contacts = match repo.list_contacts().await {
        Ok(models) => models,
        Err(e) => {
            error!(error = %e, "failed to list contact messages");
            return internal_error();
        }
    };

    let admission_entries: Vec<AdmissionEntry> = admissions
        .iter()
        .map(|model| AdmissionEntry {
            selected_class: model.selected_class.clone(),
            created_at: model.created_at.with_timezone(&Utc),
        })
        .collect();
    let contact_entries: Vec<ContactEntry> = contacts
        .iter()
        .map(|model| ContactEntry {
            created_at: model.created_at.with_timezone(&Utc),
        })
        .collect();

    let stats = summarize(&admission_entries, &contact_entries, Utc::now());

    let response = SubmissionsResponse {
        admissions: admissions.into_iter().map(admission_to_response).collect(),
        contacts: contacts.into_iter().map(contact_to_response).collect(),
        stats,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_request_rejects_bad_email() {
        let payload: AdmissionRequest = serde_json::from_value(serde_json::json!({
            "name": "Putu",
            "email": "not-an-email",
            "phone": "08123456789",
            "city": "Denpasar",
            "selected_class": "Kyumino - Beginner"
        }))
        .expect("deserializes");

        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_contact_request_minimal_fields() {
        let payload: ContactRequest = serde_json::from_value(serde_json::json!({
            "name": "Made",
            "email": "made@example.com",
            "message": "What are the class times?"
        }))
        .expect("deserializes");

        assert!(payload.validate().is_ok());
        assert!(payload.phone.is_none());
        assert!(payload.subject.is_none());
    }
}
