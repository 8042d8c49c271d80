//! Admin authentication routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use nsk_core::auth::verify_password;
use nsk_db::AdminUserRepository;
use nsk_shared::{AccessToken, LoginRequest};

/// Creates the authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Uniform 401 for bad credentials; the response never reveals whether the
/// email or the password was wrong.
fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

/// POST `/auth/login`
/// Verify admin credentials and issue an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = AdminUserRepository::new((*state.db).clone());

    let user = match repo.find_active_by_email(&payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(email = %payload.email, "login attempt for unknown email");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "failed to look up admin user");
            return super::internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!(email = %payload.email, "login attempt with wrong password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "password verification failed");
            return super::internal_error();
        }
    }

    match state.jwt_service.generate_access_token(user.id, "admin") {
        Ok(token) => {
            info!(user_id = %user.id, "admin logged in");
            let response =
                AccessToken::new(token, state.jwt_service.access_token_expires_in());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to generate access token");
            super::internal_error()
        }
    }
}
