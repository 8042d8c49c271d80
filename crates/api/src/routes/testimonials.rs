//! Testimonial management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::{
    MediaPlan, db_error_response, internal_error, media_plan, not_found, save_error_response,
};
use crate::AppState;
use crate::middleware::AuthUser;
use nsk_core::content::TestimonialDraft;
use nsk_core::media::save_with_media;
use nsk_db::TestimonialRepository;
use nsk_db::entities::testimonials;

/// Creates the public testimonial routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/testimonials", get(list_testimonials))
}

/// Creates the admin testimonial routes (nested under `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/testimonials",
            get(list_testimonials).post(save_testimonial),
        )
        .route("/testimonials/{id}", delete(delete_testimonial))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the testimonial listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Cap the number of returned testimonials (home page shows 3).
    pub limit: Option<u64>,
}

/// Request body for saving a testimonial.
#[derive(Debug, Deserialize)]
pub struct SaveTestimonialRequest {
    /// The testimonial draft (id present when editing).
    #[serde(flatten)]
    pub draft: TestimonialDraft,
    /// Preview token of a staged photo to commit on save.
    #[serde(default)]
    pub staged_media: Option<Uuid>,
    /// Clear the stored photo on save.
    #[serde(default)]
    pub remove_image: bool,
}

/// Response for a testimonial.
#[derive(Debug, Serialize)]
pub struct TestimonialResponse {
    /// Testimonial ID.
    pub id: Uuid,
    /// Student name.
    pub name: String,
    /// Testimonial content.
    pub content: String,
    /// Belt level.
    pub belt_level: String,
    /// Rating on a 1-5 scale.
    pub rating: i16,
    /// Photo URL, if any.
    pub image_url: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

fn to_response(model: testimonials::Model) -> TestimonialResponse {
    TestimonialResponse {
        id: model.id,
        name: model.name,
        content: model.content,
        belt_level: model.belt_level,
        rating: model.rating,
        image_url: model.image_url,
        created_at: model.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/testimonials`
/// List testimonials, newest first; `?limit=` caps the result.
async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = TestimonialRepository::new((*state.db).clone());

    match repo.list(query.limit).await {
        Ok(models) => {
            let items: Vec<TestimonialResponse> = models.into_iter().map(to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list testimonials");
            internal_error()
        }
    }
}

/// POST `/admin/testimonials`
/// Save a testimonial draft; commits staged media first.
async fn save_testimonial(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveTestimonialRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.draft.validate() {
        return super::bad_request("invalid_draft", e.to_string());
    }

    let repo = TestimonialRepository::new((*state.db).clone());

    let existing_image = match payload.draft.id {
        Some(id) => match repo.find_by_id(id).await {
            Ok(Some(model)) => model.image_url,
            Ok(None) => return not_found("Testimonial not found"),
            Err(e) => {
                error!(error = %e, "failed to fetch testimonial for save");
                return internal_error();
            }
        },
        None => None,
    };

    let plan = match media_plan(
        &state,
        TestimonialDraft::MEDIA_FOLDER,
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
            info!(testimonial_id = %model.id, admin_id = %auth.user_id(), created, "testimonial saved");
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(to_response(model))).into_response()
        }
        Err(response) => response,
    }
}

/// DELETE `/admin/testimonials/{id}`
/// Delete a testimonial.
async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TestimonialRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(true) => {
            info!(testimonial_id = %id, "testimonial deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found("Testimonial not found"),
        Err(e) => {
            error!(error = %e, "failed to delete testimonial");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_rating_is_required() {
        let result: Result<SaveTestimonialRequest, _> =
            serde_json::from_value(serde_json::json!({
                "name": "Ayu",
                "content": "Great classes",
                "belt_level": "Brown Belt"
            }));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_request_with_media_directives() {
        let payload: SaveTestimonialRequest = serde_json::from_value(serde_json::json!({
            "name": "Ayu",
            "content": "Great classes",
            "belt_level": "Brown Belt",
            "rating": 5,
            "remove_image": true
        }))
        .expect("valid payload");

        assert!(payload.remove_image);
        assert!(payload.staged_media.is_none());
    }
}
