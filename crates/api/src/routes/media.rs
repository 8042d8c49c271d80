//! Media staging routes.
//!
//! The admin panel stages an image in one request (validate + preview) and
//! commits it later by referencing the returned token in an entity save.
//! Discarding the token, or never saving, uploads nothing.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use super::{bad_request, internal_error, not_found, storage_unavailable};
use crate::AppState;
use nsk_core::media::{StagedFile, UploadStaging};

/// Multipart bodies may exceed the image limit; validation turns oversized
/// files into a 400 instead of a blunt 413.
const STAGE_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Creates the media staging routes (nested under `/admin`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/media/stage",
            post(stage_media).layer(DefaultBodyLimit::max(STAGE_BODY_LIMIT)),
        )
        .route("/media/stage/{token}", delete(discard_media))
        .route("/media/preview/{token}", get(preview_media))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a staged upload.
#[derive(Debug, Serialize)]
pub struct StageResponse {
    /// Token to reference in the entity save (or discard).
    pub token: Uuid,
    /// Where the staged image can be previewed.
    pub preview_url: String,
    /// Original filename.
    pub filename: String,
    /// Staged file size in bytes.
    pub size: u64,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/admin/media/stage`
/// Validate and stage an image without uploading it.
async fn stage_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let Some(storage) = &state.storage else {
        return storage_unavailable();
    };

    let mut staged = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }

                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                match field.bytes().await {
                    Ok(bytes) => {
                        staged = Some(StagedFile::new(filename, content_type, bytes));
                        break;
                    }
                    Err(e) => return bad_request("malformed_multipart", e.to_string()),
                }
            }
            Ok(None) => break,
            Err(e) => return bad_request("malformed_multipart", e.to_string()),
        }
    }

    let Some(file) = staged else {
        return bad_request("missing_file", "Multipart field 'file' is required");
    };

    let filename = file.filename.clone();
    let size = file.size();

    // The real folder is supplied by the entity save at commit time; this
    // instance only validates and registers the preview.
    let mut staging = UploadStaging::new(storage.clone(), state.previews.clone(), "staged");

    match staging.select_file(file) {
        Ok(_) => {
            let Some(token) = staging.detach() else {
                return internal_error();
            };

            info!(token = %token, size, "media staged");
            let response = StageResponse {
                token,
                preview_url: format!("/api/v1/admin/media/preview/{token}"),
                filename,
                size,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) if err.is_validation() => bad_request("invalid_image", err.to_string()),
        Err(err) => {
            error!(error = %err, "failed to stage media");
            internal_error()
        }
    }
}

/// GET `/admin/media/preview/{token}`
/// Serve the staged image bytes for preview.
async fn preview_media(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> impl IntoResponse {
    match state.previews.get(token) {
        Some(file) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, file.content_type)],
            file.bytes,
        )
            .into_response(),
        None => not_found("No staged media for this token"),
    }
}

/// DELETE `/admin/media/stage/{token}`
/// Discard a staged image without uploading it.
async fn discard_media(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> impl IntoResponse {
    if state.previews.release(token) {
        info!(token = %token, "staged media discarded");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("No staged media for this token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::routes::api_routes_with_state;
    use nsk_core::media::PreviewStore;
    use nsk_core::storage::{StorageConfig, StorageProvider, StorageService};
    use nsk_shared::{JwtConfig, JwtService};

    fn test_state(with_storage: bool) -> AppState {
        let storage = with_storage.then(|| {
            let root = std::env::temp_dir().join(format!("nsk-media-{}", Uuid::new_v4()));
            std::fs::create_dir_all(&root).expect("create temp dir");
            let config =
                StorageConfig::new(StorageProvider::local_fs(root), "http://localhost/media");
            Arc::new(StorageService::from_config(config).expect("create storage"))
        });

        AppState {
            db: Arc::new(DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expires_minutes: 60,
            })),
            storage,
            previews: PreviewStore::new(),
        }
    }

    fn test_app(state: &AppState) -> Router {
        api_routes_with_state(state.clone()).with_state(state.clone())
    }

    fn auth_header(state: &AppState) -> String {
        let token = state
            .jwt_service
            .generate_access_token(Uuid::new_v4(), "admin")
            .expect("generate token");
        format!("Bearer {token}")
    }

    fn multipart_body(filename: &str, content_type: &str, payload: &[u8]) -> (String, Vec<u8>) {
        let boundary = "nsk-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    fn stage_request(state: &AppState, filename: &str, content_type: &str, payload: &[u8]) -> Request<Body> {
        let (header_value, body) = multipart_body(filename, content_type, payload);
        Request::builder()
            .method("POST")
            .uri("/admin/media/stage")
            .header(header::AUTHORIZATION, auth_header(state))
            .header(header::CONTENT_TYPE, header_value)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_stage_requires_auth() {
        let state = test_state(true);
        let (header_value, body) = multipart_body("a.png", "image/png", b"\x89PNG");

        let response = test_app(&state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/media/stage")
                    .header(header::CONTENT_TYPE, header_value)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_stage_without_storage_returns_503() {
        let state = test_state(false);
        let response = test_app(&state)
            .oneshot(stage_request(&state, "a.png", "image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_stage_rejects_non_image() {
        let state = test_state(true);
        let response = test_app(&state)
            .oneshot(stage_request(&state, "doc.pdf", "application/pdf", b"%PDF"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "invalid_image");
        // nothing was staged
        assert!(state.previews.is_empty());
    }

    #[tokio::test]
    async fn test_stage_rejects_oversized_image() {
        let state = test_state(true);
        let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
        let response = test_app(&state)
            .oneshot(stage_request(&state, "big.png", "image/png", &oversized))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.previews.is_empty());
    }

    #[tokio::test]
    async fn test_stage_preview_discard_flow() {
        let state = test_state(true);
        let app = test_app(&state);

        // stage
        let response = app
            .clone()
            .oneshot(stage_request(&state, "a.png", "image/png", b"\x89PNGDATA"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let token = json["token"].as_str().unwrap().to_string();
        assert_eq!(json["filename"], "a.png");
        assert_eq!(json["size"], 8);

        // preview serves the staged bytes back
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/admin/media/preview/{token}"))
                    .header(header::AUTHORIZATION, auth_header(&state))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/png"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"\x89PNGDATA");

        // discard releases the preview resource
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/admin/media/stage/{token}"))
                    .header(header::AUTHORIZATION, auth_header(&state))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.previews.is_empty());

        // preview is gone afterwards
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/admin/media/preview/{token}"))
                    .header(header::AUTHORIZATION, auth_header(&state))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_discard_unknown_token_returns_404() {
        let state = test_state(true);
        let response = test_app(&state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/admin/media/stage/{}", Uuid::new_v4()))
                    .header(header::AUTHORIZATION, auth_header(&state))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
