//! Password login issuing a bearer token.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error};

use crate::auth::password;

use super::state::AuthState;
use super::storage::lookup_user_by_email;
use super::types::{LoginRequest, TokenResponse};
use super::utils::{normalize_email, valid_email};

/// Exchange email + password for a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid email or password", body = String),
        (status = 403, description = "Account inactive or unverified", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        // Malformed addresses cannot exist; answer exactly like a failed login.
        return unauthorized();
    }

    let user = match lookup_user_by_email(&pool, &email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("Login for unknown email");
            return unauthorized();
        }
        Err(err) => {
            error!("Failed to lookup user for login: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string())
                .into_response();
        }
    };

    let password = request.password;
    let stored = user.password_hash.clone();
    let verified =
        match tokio::task::spawn_blocking(move || password::verify_password(&password, &stored))
            .await
        {
            Ok(verified) => verified,
            Err(err) => {
                error!("Password verification task failed: {err}");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string())
                    .into_response();
            }
        };

    if !verified {
        return unauthorized();
    }

    if !user.is_active {
        return (
            StatusCode::FORBIDDEN,
            "User account is inactive".to_string(),
        )
            .into_response();
    }

    if !user.email_verified {
        return (
            StatusCode::FORBIDDEN,
            "Please verify your email before logging in".to_string(),
        )
            .into_response();
    }

    match auth_state.tokens().issue(user.id) {
        Ok(token) => (StatusCode::OK, Json(TokenResponse::bearer(token, &user))).into_response(),
        Err(err) => {
            error!("Failed to issue session token: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string()).into_response()
        }
    }
}

// A stored-hash mismatch, an unknown address, and a malformed address all
// produce this exact response.
fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        "Invalid email or password".to_string(),
    )
        .into_response()
}
