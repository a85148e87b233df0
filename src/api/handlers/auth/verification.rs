//! Email verification endpoints.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::email::{EmailSender, VerificationEmail};
use crate::auth::otp;

use super::state::AuthState;
use super::storage::{consume_verification_code, refresh_verification_code};
use super::types::{ResendCodeRequest, TokenResponse, VerifyEmailRequest};
use super::utils::{normalize_email, valid_email};

/// Consume a verification code, activate the account, and log the user in.
///
/// A wrong, expired, already-consumed, or never-issued code all yield the
/// same 400; the endpoint is not an oracle for account state.
#[utoipa::path(
    post,
    path = "/v1/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = TokenResponse),
        (status = 400, description = "Invalid verification code", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<VerifyEmailRequest>>,
) -> impl IntoResponse {
    let request: VerifyEmailRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    let code = request.code.trim();
    if !valid_email(&email) || code.is_empty() {
        return invalid_code();
    }

    match consume_verification_code(&pool, &email, code, Utc::now()).await {
        Ok(Some(user)) => match auth_state.tokens().issue(user.id) {
            Ok(token) => {
                (StatusCode::OK, Json(TokenResponse::bearer(token, &user))).into_response()
            }
            Err(err) => {
                error!("Failed to issue session token: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Verification failed".to_string(),
                )
                    .into_response()
            }
        },
        Ok(None) => invalid_code(),
        Err(err) => {
            error!("Failed to verify email: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Verification failed".to_string(),
            )
                .into_response()
        }
    }
}

fn invalid_code() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        "Invalid verification code".to_string(),
    )
        .into_response()
}

/// Issue a fresh verification code (always 204 to avoid account probing).
///
/// The previous code is superseded; unknown or already-verified addresses
/// get the same response as pending ones.
#[utoipa::path(
    post,
    path = "/v1/auth/resend-code",
    request_body = ResendCodeRequest,
    responses(
        (status = 204, description = "Resend accepted")
    ),
    tag = "auth"
)]
pub async fn resend_code(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    sender: Extension<Arc<dyn EmailSender>>,
    payload: Option<Json<ResendCodeRequest>>,
) -> impl IntoResponse {
    let request: ResendCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let code = match otp::generate_code() {
        Ok(code) => code,
        Err(err) => {
            // Entropy failure is loud in the logs; the response stays opaque.
            error!("Failed to generate verification code: {err}");
            return StatusCode::NO_CONTENT.into_response();
        }
    };
    let expires_at = Utc::now() + Duration::seconds(auth_state.config().code_ttl_seconds());

    match refresh_verification_code(&pool, &email, &code, expires_at).await {
        Ok(true) => {
            if let Err(err) = sender.send_verification(&VerificationEmail {
                to_email: &email,
                code: &code,
                expires_at,
            }) {
                error!("Failed to send verification email: {err}");
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to refresh verification code: {err}");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
