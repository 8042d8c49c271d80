//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::auth::auth_middleware};
use nsk_core::media::{MediaError, SaveError, UploadStaging};
use nsk_shared::AppError;

pub mod auth;
pub mod events;
pub mod gallery;
pub mod health;
pub mod media;
pub mod programs;
pub mod submissions;
pub mod testimonials;

/// Creates the API router: public routes plus the `/admin` subtree behind
/// the authentication middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .merge(events::admin_routes())
        .merge(testimonials::admin_routes())
        .merge(programs::admin_routes())
        .merge(gallery::admin_routes())
        .merge(submissions::admin_routes())
        .merge(media::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(events::routes())
        .merge(testimonials::routes())
        .merge(programs::routes())
        .merge(gallery::routes())
        .merge(submissions::routes())
        .nest("/admin", admin_routes)
}

// ============================================================================
// Shared response helpers
// ============================================================================

/// Renders an [`AppError`] as its canonical JSON response.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({ "error": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

/// 400 with an error code and message.
pub(crate) fn bad_request(error: &str, message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error, "message": message.into() })),
    )
        .into_response()
}

/// 404 with a message.
pub(crate) fn not_found(message: &str) -> Response {
    error_response(&AppError::NotFound(message.to_string()))
}

/// 500 with a generic body; details stay in the logs.
pub(crate) fn internal_error() -> Response {
    error_response(&AppError::Internal("An error occurred".to_string()))
}

/// 503 when object storage is not configured.
pub(crate) fn storage_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "storage_not_configured",
            "message": "File storage is not configured"
        })),
    )
        .into_response()
}

/// Maps a repository error onto an HTTP response.
pub(crate) fn db_error_response(err: &DbErr) -> Response {
    match err {
        DbErr::RecordNotFound(message) => error_response(&AppError::NotFound(message.clone())),
        DbErr::Custom(message) => error_response(&AppError::Validation(message.clone())),
        other => {
            error!(error = %other, "database operation failed");
            error_response(&AppError::Database("Database operation failed".to_string()))
        }
    }
}

/// Maps a save-protocol failure onto an HTTP response.
pub(crate) fn save_error_response(err: &SaveError<DbErr>) -> Response {
    match err {
        SaveError::Media(media) if media.is_validation() => {
            bad_request("invalid_image", media.to_string())
        }
        SaveError::Media(MediaError::UnknownToken(_)) => bad_request(
            "unknown_staged_media",
            "Staged media not found; it may have expired",
        ),
        SaveError::Media(media) => {
            error!(error = %media, "media commit failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "upload_failed",
                    "message": "Image upload failed; the selection is kept for retry"
                })),
            )
                .into_response()
        }
        SaveError::Persist(db) => db_error_response(db),
    }
}

// ============================================================================
// Media plan for entity saves
// ============================================================================

/// How an entity save will obtain its final image URL.
pub(crate) enum MediaPlan {
    /// Run the staged-commit protocol before the upsert.
    Staged(Box<UploadStaging>),
    /// No storage involvement; persist this URL as-is.
    Direct(Option<String>),
}

/// Builds the media plan for a save request.
///
/// `existing` is the image URL currently stored on the record (if editing),
/// `staged` the preview token from an earlier stage request, and `remove`
/// the explicit clear flag. Staging anything requires configured storage.
pub(crate) fn media_plan(
    state: &AppState,
    folder: &str,
    existing: Option<String>,
    staged: Option<Uuid>,
    remove: bool,
) -> Result<MediaPlan, Response> {
    let seeded = if remove { None } else { existing };

    match (&state.storage, staged) {
        (None, Some(_)) => Err(storage_unavailable()),
        (None, None) => Ok(MediaPlan::Direct(seeded)),
        (Some(storage), staged) => {
            let mut staging =
                UploadStaging::new(storage.clone(), state.previews.clone(), folder)
                    .with_committed(seeded);

            if let Some(token) = staged {
                staging.resume(token).map_err(|err| {
                    save_error_response(&SaveError::<DbErr>::Media(err))
                })?;
            }

            Ok(MediaPlan::Staged(Box::new(staging)))
        }
    }
}
