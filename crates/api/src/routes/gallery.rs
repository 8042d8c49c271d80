//! Gallery management routes.

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
use nsk_core::content::GalleryImageDraft;
use nsk_core::media::save_with_media;
use nsk_db::GalleryRepository;
use nsk_db::entities::gallery_images;

/// Creates the public gallery routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/gallery", get(list_gallery))
}

/// Creates the admin gallery routes (nested under `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(list_gallery).post(save_gallery_image))
        .route("/gallery/{id}", delete(delete_gallery_image))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the gallery listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Restrict to a single gallery section.
    pub section: Option<String>,
}

/// Request body for saving a gallery image record.
#[derive(Debug, Deserialize)]
pub struct SaveGalleryImageRequest {
    /// The gallery image draft (id present when editing).
    #[serde(flatten)]
    pub draft: GalleryImageDraft,
    /// Preview token of a staged image to commit on save.
    #[serde(default)]
    pub staged_media: Option<Uuid>,
}

/// Response for a gallery image.
#[derive(Debug, Serialize)]
pub struct GalleryImageResponse {
    /// Gallery image ID.
    pub id: Uuid,
    /// Image title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Image URL.
    pub image_url: String,
    /// Gallery section.
    pub section: String,
    /// Sort position.
    pub display_order: i32,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

fn to_response(model: gallery_images::Model) -> GalleryImageResponse {
    GalleryImageResponse {
        id: model.id,
        title: model.title,
        description: model.description,
        image_url: model.image_url,
        section: model.section,
        display_order: model.display_order,
        created_at: model.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/gallery`
/// List gallery images in display order; `?section=` filters.
async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = GalleryRepository::new((*state.db).clone());

    match repo.list(query.section.as_deref()).await {
        Ok(models) => {
            let items: Vec<GalleryImageResponse> =
                models.into_iter().map(to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list gallery images");
            internal_error()
        }
    }
}

/// POST `/admin/gallery`
/// Save a gallery image record. Gallery entries always carry an image, so a
/// create without staged media is rejected before any write.
async fn save_gallery_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveGalleryImageRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.draft.validate() {
        return super::bad_request("invalid_draft", e.to_string());
    }

    let repo = GalleryRepository::new((*state.db).clone());

    let existing_image = match payload.draft.id {
        Some(id) => match repo.find_by_id(id).await {
            Ok(Some(model)) => Some(model.image_url),
            Ok(None) => return not_found("Gallery image not found"),
            Err(e) => {
                error!(error = %e, "failed to fetch gallery image for save");
                return internal_error();
            }
        },
        None => None,
    };

    if existing_image.is_none() && payload.staged_media.is_none() {
        return super::bad_request(
            "missing_image",
            "A gallery entry requires a staged image",
        );
    }

    let plan = match media_plan(
        &state,
        GalleryImageDraft::MEDIA_FOLDER,
        existing_image,
        payload.staged_media,
        false,
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
            info!(gallery_image_id = %model.id, admin_id = %auth.user_id(), created, "gallery image saved");
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(to_response(model))).into_response()
        }
        Err(response) => response,
    }
}

/// DELETE `/admin/gallery/{id}`
/// Delete a gallery image record. The stored object stays in storage.
async fn delete_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = GalleryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(true) => {
            info!(gallery_image_id = %id, "gallery image deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found("Gallery image not found"),
        Err(e) => {
            error!(error = %e, "failed to delete gallery image");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_display_order_defaults_to_zero() {
        let payload: SaveGalleryImageRequest = serde_json::from_value(serde_json::json!({
            "title": "Dojo opening",
            "section": "dojo",
            "staged_media": "8f2f8f66-5a0f-4a6e-9ef8-1f2e364a5a10"
        }))
        .expect("valid payload");

        assert_eq!(payload.draft.display_order, 0);
        assert!(payload.draft.description.is_none());
    }
}
