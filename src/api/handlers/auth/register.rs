//! User registration with pending email verification.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::email::{EmailSender, VerificationEmail};
use crate::auth::{otp, password};

use super::state::AuthState;
use super::storage::{SignupOutcome, insert_pending_user};
use super::types::{RegisterRequest, RegisterResponse};
use super::utils::{normalize_email, valid_email, valid_password};

/// Create an account and issue a verification code for it.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration accepted, verification pending", body = RegisterResponse),
        (status = 400, description = "Invalid payload", body = String),
        (status = 409, description = "Email already registered", body = String)
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    sender: Extension<Arc<dyn EmailSender>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }
    if !valid_password(&request.password) {
        return (
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters".to_string(),
        )
            .into_response();
    }
    let full_name = request.full_name.trim().to_string();
    if full_name.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing full name".to_string()).into_response();
    }

    // Argon2id is memory-hard on purpose; keep it off the async workers.
    let password = request.password;
    let hashed = match tokio::task::spawn_blocking(move || password::hash_password(&password)).await
    {
        Ok(Ok(hashed)) => hashed,
        Ok(Err(err)) => {
            error!("Failed to hash password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response();
        }
        Err(err) => {
            error!("Password hashing task failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response();
        }
    };

    let code = match otp::generate_code() {
        Ok(code) => code,
        Err(err) => {
            error!("Failed to generate verification code: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response();
        }
    };
    let expires_at = Utc::now() + Duration::seconds(auth_state.config().code_ttl_seconds());

    match insert_pending_user(&pool, &email, &full_name, &hashed, &code, expires_at).await {
        Ok(SignupOutcome::Created(user_id)) => {
            // Delivery failure keeps the account pending; the code can be resent.
            if let Err(err) = sender.send_verification(&VerificationEmail {
                to_email: &email,
                code: &code,
                expires_at,
            }) {
                error!("Failed to send verification email: {err}");
            }
            let response = RegisterResponse {
                user_id,
                email,
                message: "Registration successful. Check your email for the verification code."
                    .to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Ok(SignupOutcome::Conflict) => (
            StatusCode::CONFLICT,
            "Email already registered".to_string(),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to register user: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::register;
    use crate::api::email::{EmailSender, LogEmailSender};
    use crate::api::handlers::auth::state::{AuthConfig, AuthState};
    use crate::api::handlers::auth::types::RegisterRequest;
    use crate::auth::secret::TokenSecret;
    use anyhow::Result;
    use axum::Json;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn auth_state() -> Result<Arc<AuthState>> {
        let secret = TokenSecret::new(SecretString::from(
            "0123456789abcdef0123456789abcdef".to_string(),
        ))?;
        Ok(Arc::new(AuthState::new(AuthConfig::new(), &secret)))
    }

    fn sender() -> Arc<dyn EmailSender> {
        Arc::new(LogEmailSender)
    }

    #[tokio::test]
    async fn register_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = register(
            Extension(pool),
            Extension(auth_state()?),
            Extension(sender()),
            None,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_invalid_email() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = register(
            Extension(pool),
            Extension(auth_state()?),
            Extension(sender()),
            Some(Json(RegisterRequest {
                email: "not-an-email".to_string(),
                password: "Secret123!".to_string(),
                full_name: "Alice".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_short_password() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = register(
            Extension(pool),
            Extension(auth_state()?),
            Extension(sender()),
            Some(Json(RegisterRequest {
                email: "alice@example.com".to_string(),
                password: "short1!".to_string(),
                full_name: "Alice".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_blank_full_name() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = register(
            Extension(pool),
            Extension(auth_state()?),
            Extension(sender()),
            Some(Json(RegisterRequest {
                email: "alice@example.com".to_string(),
                password: "Secret123!".to_string(),
                full_name: "   ".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
