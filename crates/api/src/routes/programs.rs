//! Program management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::{
    MediaPlan, db_error_response, internal_error, media_plan, not_found, save_error_response,
};
use crate::AppState;
use crate::middleware::AuthUser;
use nsk_core::content::ProgramDraft;
use nsk_core::media::save_with_media;
use nsk_db::ProgramRepository;
use nsk_db::entities::programs;
use nsk_db::repositories::json_string_list;

/// Creates the public program routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/programs", get(list_programs))
}

/// Creates the admin program routes (nested under `/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs).post(save_program))
        .route("/programs/{id}", delete(delete_program))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for saving a program.
#[derive(Debug, Deserialize)]
pub struct SaveProgramRequest {
    /// The program draft (id present when editing).
    #[serde(flatten)]
    pub draft: ProgramDraft,
    /// Preview token of a staged image to commit on save.
    #[serde(default)]
    pub staged_media: Option<Uuid>,
    /// Clear the stored image on save.
    #[serde(default)]
    pub remove_image: bool,
}

/// Response for a program.
#[derive(Debug, Serialize)]
pub struct ProgramResponse {
    /// Program ID.
    pub id: Uuid,
    /// Program name.
    pub name: String,
    /// Program description.
    pub description: String,
    /// Monthly price.
    pub price: Decimal,
    /// Feature bullet points.
    pub features: Vec<String>,
    /// Image URL, if any.
    pub image_url: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
    /// Updated at timestamp (ISO 8601).
    pub updated_at: String,
}

fn to_response(model: programs::Model) -> ProgramResponse {
    ProgramResponse {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        features: json_string_list(&model.features),
        image_url: model.image_url,
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/programs`
/// List programs, cheapest first.
async fn list_programs(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ProgramRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(models) => {
            let items: Vec<ProgramResponse> = models.into_iter().map(to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to list programs");
            internal_error()
        }
    }
}

/// POST `/admin/programs`
/// Save a program draft; commits staged media first.
async fn save_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveProgramRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.draft.validate() {
        return super::bad_request("invalid_draft", e.to_string());
    }

    let repo = ProgramRepository::new((*state.db).clone());

    let existing_image = match payload.draft.id {
        Some(id) => match repo.find_by_id(id).await {
            Ok(Some(model)) => model.image_url,
            Ok(None) => return not_found("Program not found"),
            Err(e) => {
                error!(error = %e, "failed to fetch program for save");
                return internal_error();
            }
        },
        None => None,
    };

    let plan = match media_plan(
        &state,
        ProgramDraft::MEDIA_FOLDER,
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
            info!(program_id = %model.id, admin_id = %auth.user_id(), created, "program saved");
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(to_response(model))).into_response()
        }
        Err(response) => response,
    }
}

/// DELETE `/admin/programs/{id}`
/// Delete a program.
async fn delete_program(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = ProgramRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(true) => {
            info!(program_id = %id, "program deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found("Program not found"),
        Err(e) => {
            error!(error = %e, "failed to delete program");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_price_accepts_decimal_string() {
        let payload: SaveProgramRequest = serde_json::from_value(serde_json::json!({
            "name": "Kyumino",
            "description": "Beginner program",
            "price": "49.00",
            "features": ["2 classes / week"]
        }))
        .expect("valid payload");

        assert_eq!(payload.draft.price.to_string(), "49.00");
    }
}
