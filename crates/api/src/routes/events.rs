//! Event management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::{
    MediaPlan, db_error_response, internal_error, media_plan, not_found, save_error_response,
};
use crate::AppState;
use crate::middleware::AuthUser;
use nsk_core::content::EventDraft;
use nsk_core::media::save_with_media;
use nsk_db::EventRepository;
use nsk_db::entities::events;
use nsk_db::repositories::json_string_list;

/// Creates the public event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}

/// Creates the admin event routes (nested under `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(save_event))
        .route("/events/{id}", delete(delete_event))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for saving an event.
#[derive(Debug, Deserialize)]
pub struct SaveEventRequest {
    /// The event draft (id present when editing).
    #[serde(flatten)]
    pub draft: EventDraft,
    /// Preview token of a staged image to commit on save.
    #[serde(default)]
    pub staged_media: Option<Uuid>,
    /// Clear the stored image on save.
    #[serde(default)]
    pub remove_image: bool,
}

/// Response for an event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Event ID.
    pub id: Uuid,
    /// Event title.
    pub title: String,
    /// Short excerpt.
    pub excerpt: String,
    /// Full content.
    pub content: String,
    /// Event date.
    pub date: NaiveDate,
    /// Tags.
    pub tags: Vec<String>,
    /// Image URL, if any.
    pub image_url: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
    /// Updated at timestamp (ISO 8601).
    pub updated_at: String,
}

fn to_response(model: events::Model) -> EventResponse {
    EventResponse {
        id: model.id,
        title: model.title,
        excerpt: model.excerpt,
        content: model.content,
        date: model.date,
        tags: json_string_list(&model.tags),
        image_url: model.image_url,
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/events`
/// List events, newest event date first.
async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    let repo = EventRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(models) => {
            let items: Vec<EventResponse> = models.into_iter().map(to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list events");
            internal_error()
        }
    }
}

/// GET `/events/{id}`
/// Fetch a single event.
async fn get_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = EventRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(model)) => (StatusCode::OK, Json(to_response(model))).into_response(),
        Ok(None) => not_found("Event not found"),
        Err(e) => {
            error!(error = %e, "failed to fetch event");
            internal_error()
        }
    }
}

/// POST `/admin/events`
/// Save an event draft; commits staged media first.
async fn save_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveEventRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.draft.validate() {
        return super::bad_request("invalid_draft", e.to_string());
    }

    let repo = EventRepository::new((*state.db).clone());

    let existing_image = match payload.draft.id {
        Some(id) => match repo.find_by_id(id).await {
            Ok(Some(model)) => model.image_url,
            Ok(None) => return not_found("Event not found"),
            Err(e) => {
                error!(error = %e, "failed to fetch event for save");
                return internal_error();
            }
        },
        None => None,
    };

    let plan = match media_plan(
        &state,
        EventDraft::MEDIA_FOLDER,
        existing_image,
        payload.staged_media,
        payload.remove_image,
    ) {
        Ok(plan) => plan,
        Err(response) => return response,
    };

    let created = payload.draft.id.is_none();
    let draft = payload.draft;

    let saved = match plan {
        MediaPlan::Staged(mut staging) => {
            save_with_media(&mut staging, |url| repo.upsert(&draft, url))
                .await
                .map_err(|e| save_error_response(&e))
        }
        MediaPlan::Direct(url) => repo
            .upsert(&draft, url)
            .await
            .map_err(|e| db_error_response(&e)),
    };

    match saved {
        Ok(model) => {
            info!(event_id = %model.id, admin_id = %auth.user_id(), created, "event saved");
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(to_response(model))).into_response()
        }
        Err(response) => response,
    }
}

/// DELETE `/admin/events/{id}`
/// Delete an event. Any uploaded image stays in storage.
async fn delete_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = EventRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(true) => {
            info!(event_id = %id, "event deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found("Event not found"),
        Err(e) => {
            error!(error = %e, "failed to delete event");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_flattens_draft() {
        let payload: SaveEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Belt grading",
            "excerpt": "Grading day",
            "content": "All belts welcome.",
            "date": "2026-08-22",
            "tags": ["grading"],
            "staged_media": "8f2f8f66-5a0f-4a6e-9ef8-1f2e364a5a10"
        }))
        .expect("valid payload");

        assert_eq!(payload.draft.title, "Belt grading");
        assert!(payload.draft.id.is_none());
        assert!(payload.staged_media.is_some());
        assert!(!payload.remove_image);
    }

    #[test]
    fn test_save_request_defaults() {
        let payload: SaveEventRequest = serde_json::from_value(serde_json::json!({
            "title": "t",
            "excerpt": "e",
            "content": "c",
            "date": "2026-01-01"
        }))
        .expect("valid payload");

        assert!(payload.draft.tags.is_empty());
        assert!(payload.staged_media.is_none());
        assert!(!payload.remove_image);
    }
}
